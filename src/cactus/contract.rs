//! Region contraction with the sparse-hub fast path
//!
//! Canonical set contraction walks every edge incident to the region. When
//! one region vertex dominates the degree sum, folding the sparse members
//! into it one by one avoids rescanning the hub's long adjacency list on
//! every merge.

use std::collections::HashSet;

use crate::config::{HUB_DEGREE, NONLOW_DEGREE};
use crate::error::Result;
use crate::graph::{MutableGraph, VertexId};

/// Contract `region` in the cactus.
///
/// Takes the sparse fast path when all of the following hold: every region
/// vertex contains at least one original vertex (so it can be re-found after
/// positions drift), at most one vertex has degree above [`HUB_DEGREE`], at
/// most one has degree above [`NONLOW_DEGREE`], and a hub above
/// [`HUB_DEGREE`] exists. Otherwise falls back to canonical set contraction.
pub fn contract_region(cactus: &mut MutableGraph, region: &HashSet<VertexId>) -> Result<()> {
    let mut hub: Option<VertexId> = None;
    let mut non_low = 0usize;
    let mut alternative = true;

    for &v in region {
        if cactus.num_contained(v) == 0 {
            alternative = false;
            break;
        }
        if cactus.degree(v) > HUB_DEGREE {
            if hub.is_some() {
                alternative = false;
                break;
            }
            hub = Some(v);
        }
        if cactus.degree(v) > NONLOW_DEGREE {
            non_low += 1;
        }
        if non_low > 1 {
            alternative = false;
            break;
        }
    }

    match hub {
        Some(hub) if alternative => {
            let hub_orig = cactus.contained(hub)[0];
            let sparse_origs: Vec<VertexId> = region
                .iter()
                .filter(|&&v| v != hub)
                .map(|&v| cactus.contained(v)[0])
                .collect();

            // Positions drift as folds proceed; re-resolve both ends each time.
            for orig in sparse_origs {
                let s = cactus.position(hub_orig);
                let t = cactus.position(orig);
                match cactus.edge_slot(t, s) {
                    Some(t_slot) => {
                        let s_slot = cactus.reverse_slot(t, t_slot);
                        cactus.contract_edge_sparse_target(s, s_slot)?;
                    }
                    None => cactus.contract_sparse_target_no_edge(s, t)?,
                }
            }
            Ok(())
        }
        _ => {
            cactus.contract_vertex_set(region)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    /// star with `spokes` leaves around vertex 0, plus a tail 0-(n-1)
    fn star(spokes: usize) -> MutableGraph {
        let mut g = MutableGraph::new(spokes + 1);
        for i in 1..=spokes {
            g.new_edge_order(0, i as VertexId, 3).unwrap();
        }
        g
    }

    #[test]
    fn test_canonical_small_region() {
        let mut c = MutableGraph::from_edges(4, &[(0, 1, 2), (1, 2, 2), (2, 3, 2)]).unwrap();
        let region: HashSet<VertexId> = [1, 2].into_iter().collect();
        contract_region(&mut c, &region).unwrap();
        assert_eq!(c.num_vertices(), 3);
        c.check_consistency().unwrap();
    }

    #[test]
    fn test_sparse_path_matches_canonical() {
        // hub with 120 spokes; contract hub plus three leaves both ways
        let mut fast = star(120);
        let mut slow = fast.clone();
        let region: HashSet<VertexId> = [0, 1, 2, 3].into_iter().collect();

        contract_region(&mut fast, &region).unwrap();
        slow.contract_vertex_set(&region).unwrap();

        fast.check_consistency().unwrap();
        assert_eq!(fast.num_vertices(), slow.num_vertices());
        for orig in [0u32, 1, 2, 3] {
            assert_eq!(fast.position(orig), fast.position(0));
            assert_eq!(slow.position(orig), slow.position(0));
        }
        // same weight towards every untouched leaf
        for leaf in 4..121u32 {
            let f = fast.position(0);
            let s = slow.position(0);
            let fw: u64 = fast
                .edges_of(f)
                .iter()
                .filter(|e| e.target == fast.position(leaf))
                .map(|e| e.weight)
                .sum();
            let sw: u64 = slow
                .edges_of(s)
                .iter()
                .filter(|e| e.target == slow.position(leaf))
                .map(|e| e.weight)
                .sum();
            assert_eq!(fw, sw);
        }
    }

    #[test]
    fn test_fast_path_requires_single_hub() {
        // two hubs in the region force the canonical path; outcome is the
        // same merged vertex either way
        let mut g = MutableGraph::new(250);
        for i in 2..126 {
            g.new_edge_order(0, i, 1).unwrap();
        }
        for i in 126..250 {
            g.new_edge_order(1, i, 1).unwrap();
        }
        g.new_edge_order(0, 1, 5).unwrap();
        let region: HashSet<VertexId> = [0, 1].into_iter().collect();
        contract_region(&mut g, &region).unwrap();
        assert_eq!(g.num_vertices(), 249);
        assert_eq!(g.position(1), g.position(0));
        g.check_consistency().unwrap();
    }
}
