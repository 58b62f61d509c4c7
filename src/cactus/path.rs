//! Contraction-region finder
//!
//! After an insert crosses two cactus super-vertices u and v, every min cut
//! separating u from v is destroyed. The vertices that must merge are the
//! ones common to every simple u-v path in the cactus: u, v and the
//! articulation vertices between them. Interior vertices of a cycle arc stay
//! separate; the cycle splits at its entry and exit instead.

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::error::{MinCutError, Result};
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// Per-half-edge cycle labels. `None` marks a bridge.
struct CycleLabels {
    labels: Vec<Vec<Option<u32>>>,
}

impl CycleLabels {
    fn get(&self, v: VertexId, slot: usize) -> Option<u32> {
        self.labels[v as usize][slot]
    }

    fn set(&mut self, v: VertexId, slot: usize, id: u32) -> bool {
        if self.labels[v as usize][slot].is_some() {
            return false;
        }
        self.labels[v as usize][slot] = Some(id);
        true
    }
}

/// Label every cactus edge with the id of the unique cycle containing it.
/// Fails if some edge would belong to two cycles (the graph is not a cactus).
fn label_cycles(cactus: &MutableGraph, start: VertexId) -> Result<CycleLabels> {
    let n = cactus.total_vertices();
    let mut labels = CycleLabels {
        labels: (0..n as VertexId)
            .map(|v| {
                if cactus.is_live(v) {
                    vec![None; cactus.degree(v)]
                } else {
                    Vec::new()
                }
            })
            .collect(),
    };
    let mut disc = vec![usize::MAX; n];
    // parent entry: (parent vertex, slot at parent, slot at child)
    let mut parent: Vec<Option<(VertexId, usize, usize)>> = vec![None; n];
    let mut next_cycle = 0u32;

    let mut time = 0;
    // stack of (vertex, next edge slot to look at)
    let mut stack = vec![(start, 0usize)];
    disc[start as usize] = time;
    time += 1;

    loop {
        let (v, i) = {
            let Some(top) = stack.last_mut() else { break };
            let v = top.0;
            if top.1 >= cactus.degree(v) {
                stack.pop();
                continue;
            }
            let i = top.1;
            top.1 += 1;
            (v, i)
        };
        let vs = v as usize;

        if let Some((_, _, pslot)) = parent[vs] {
            if i == pslot {
                continue;
            }
        }
        let e = cactus.edges_of(v)[i];
        let t = e.target as usize;
        if disc[t] == usize::MAX {
            disc[t] = time;
            time += 1;
            parent[t] = Some((v, i, e.reverse as usize));
            stack.push((e.target, 0));
        } else if disc[t] < disc[vs] {
            // back edge closes exactly one cycle in a cactus
            let id = next_cycle;
            next_cycle += 1;
            if !labels.set(v, i, id) || !labels.set(e.target, e.reverse as usize, id) {
                return Err(MinCutError::InternalError(
                    "edge on two cycles; graph is not a cactus".to_string(),
                ));
            }
            let mut w = v;
            while w != e.target {
                let (p, pslot_at_p, pslot_at_w) = parent[w as usize].ok_or_else(|| {
                    MinCutError::InternalError("back edge outside DFS tree path".to_string())
                })?;
                if !labels.set(w, pslot_at_w, id) || !labels.set(p, pslot_at_p, id) {
                    return Err(MinCutError::InternalError(
                        "edge on two cycles; graph is not a cactus".to_string(),
                    ));
                }
                w = p;
            }
        }
    }
    Ok(labels)
}

/// BFS path from `u` to `v`, returned as (vertex, arriving slot at vertex)
/// pairs; the first entry is `u` with no slot.
fn bfs_path(
    cactus: &MutableGraph,
    u: VertexId,
    v: VertexId,
) -> Result<Vec<(VertexId, Option<usize>)>> {
    let n = cactus.total_vertices();
    let mut prev: Vec<Option<(VertexId, usize)>> = vec![None; n];
    let mut seen = vec![false; n];
    seen[u as usize] = true;
    let mut queue = VecDeque::from([u]);
    while let Some(x) = queue.pop_front() {
        if x == v {
            break;
        }
        for (i, e) in cactus.edges_of(x).iter().enumerate() {
            if !seen[e.target as usize] {
                seen[e.target as usize] = true;
                prev[e.target as usize] = Some((x, i));
                queue.push_back(e.target);
            }
        }
    }
    if !seen[v as usize] {
        return Err(MinCutError::InternalError(format!(
            "cactus vertices {u} and {v} are disconnected"
        )));
    }
    let mut path = Vec::new();
    let mut x = v;
    while x != u {
        let (p, slot_at_p) = prev[x as usize].ok_or_else(|| {
            MinCutError::InternalError("broken BFS parent chain".to_string())
        })?;
        let slot_at_x = cactus.edges_of(p)[slot_at_p].reverse as usize;
        path.push((x, Some(slot_at_x)));
        x = p;
    }
    path.push((u, None));
    path.reverse();
    Ok(path)
}

/// Compute the set of cactus vertices that must merge when a new edge joins
/// the super-vertices `u` and `v` under a minimum cut of weight `cut`.
///
/// The region always contains `u` and `v`. It equals the whole vertex set
/// exactly when no nontrivial local contraction exists and the caller must
/// rebuild instead.
pub fn contraction_region(
    cactus: &MutableGraph,
    u: VertexId,
    v: VertexId,
    cut: EdgeWeight,
) -> Result<HashSet<VertexId>> {
    let mut region = HashSet::new();
    region.insert(u);
    region.insert(v);
    if u == v {
        return Ok(region);
    }

    let labels = label_cycles(cactus, u)?;
    let path = bfs_path(cactus, u, v)?;

    // Interior path vertices flanked by two edges of the same cycle sit on
    // a cycle arc and stay out of the region.
    for w in 1..path.len() - 1 {
        let (x, in_slot) = path[w];
        let (_, out_slot_next) = path[w + 1];
        let in_label = in_slot.and_then(|s| labels.get(x, s));
        // the outgoing edge is stored at the next vertex; translate back
        let out_label = match out_slot_next {
            Some(s) => {
                let (next, _) = path[w + 1];
                labels.get(next, s)
            }
            None => None,
        };
        match (in_label, out_label) {
            (Some(a), Some(b)) if a == b => {}
            _ => {
                region.insert(x);
            }
        }
    }

    trace!(
        source = u,
        target = v,
        cut,
        region = region.len(),
        "contraction region"
    );
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    /// path cactus 0-1-2-3 with bridge weights 2
    fn bridge_path() -> MutableGraph {
        MutableGraph::from_edges(4, &[(0, 1, 2), (1, 2, 2), (2, 3, 2)]).unwrap()
    }

    /// single cycle 0-1-2-3-4-0 with half weights
    fn cycle5() -> MutableGraph {
        MutableGraph::from_edges(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 0, 1)])
            .unwrap()
    }

    #[test]
    fn test_bridge_path_collects_everything_between() {
        let c = bridge_path();
        let region = contraction_region(&c, 0, 3, 2).unwrap();
        assert_eq!(region.len(), 4);
    }

    #[test]
    fn test_bridge_subpath() {
        let c = bridge_path();
        let region = contraction_region(&c, 1, 2, 2).unwrap();
        assert_eq!(region, [1, 2].into_iter().collect());
    }

    #[test]
    fn test_cycle_keeps_arc_interiors() {
        let c = cycle5();
        // entry 0, exit 2: arcs 0-1-2 and 0-4-3-2; only endpoints merge
        let region = contraction_region(&c, 0, 2, 2).unwrap();
        assert_eq!(region, [0, 2].into_iter().collect());
    }

    #[test]
    fn test_cycle_adjacent_vertices() {
        let c = cycle5();
        let region = contraction_region(&c, 0, 1, 2).unwrap();
        assert_eq!(region, [0, 1].into_iter().collect());
    }

    #[test]
    fn test_mixed_bridge_and_cycle() {
        // 0 -b- 1, cycle 1-2-3-4-1, 3 -b- 5
        let c = MutableGraph::from_edges(
            6,
            &[
                (0, 1, 2),
                (1, 2, 1),
                (2, 3, 1),
                (3, 4, 1),
                (4, 1, 1),
                (3, 5, 2),
            ],
        )
        .unwrap();
        let region = contraction_region(&c, 0, 5, 2).unwrap();
        // cycle entry 1 and exit 3 merge; arc interiors 2 and 4 stay
        assert_eq!(region, [0, 1, 3, 5].into_iter().collect());
    }

    #[test]
    fn test_same_vertex_is_singleton() {
        let c = bridge_path();
        let region = contraction_region(&c, 2, 2, 2).unwrap();
        assert_eq!(region, [2].into_iter().collect());
    }

    #[test]
    fn test_parallel_edges_form_two_cycle() {
        // parallel pair between 1 and 2 behaves like a cycle of length two
        let mut c = MutableGraph::from_edges(3, &[(0, 1, 2), (1, 2, 1)]).unwrap();
        c.new_edge_order(1, 2, 1).unwrap();
        let region = contraction_region(&c, 0, 2, 2).unwrap();
        assert_eq!(region, [0, 1, 2].into_iter().collect());
    }

    #[test]
    fn test_full_cover_signals_rebuild() {
        let c = bridge_path();
        let region = contraction_region(&c, 0, 3, 2).unwrap();
        assert_eq!(region.len(), c.num_vertices());
    }
}
