//! Structural tests for the cactus engine and the contraction region
//!
//! Verifies that the cactus 2-cut family equals the brute-force minimum cut
//! family on small graphs, including randomized ones, and that the dynamic
//! core keeps the family correct through contraction-only update sequences.

use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cactus_mincut::prelude::*;

/// All minimum cut sides (as original-vertex sets excluding vertex 0) by
/// scanning every bipartition. Only for graphs of up to 16 vertices.
fn brute_force_family(g: &MutableGraph, lambda: EdgeWeight) -> HashSet<BTreeSet<VertexId>> {
    let n = g.total_vertices();
    assert!(n <= 16);
    let mut out = HashSet::new();
    for mask in 1u32..(1 << n) - 1 {
        if mask & 1 != 0 {
            continue;
        }
        let side: HashSet<VertexId> = (0..n as VertexId).filter(|&v| mask >> v & 1 == 1).collect();
        if g.edge_cut(&side) == lambda {
            out.insert(side.into_iter().collect());
        }
    }
    out
}

/// All 2-cut sides of a cactus of weight `lambda`, oriented away from
/// original vertex 0: single edges and edge pairs whose weights sum to
/// `lambda` and whose removal splits the cactus.
fn cactus_family(cactus: &MutableGraph, lambda: EdgeWeight) -> HashSet<BTreeSet<VertexId>> {
    let verts: Vec<VertexId> = cactus.live_vertices().collect();
    let mut out = HashSet::new();
    let mut edges = Vec::new();
    for &v in &verts {
        for (i, e) in cactus.edges_of(v).iter().enumerate() {
            if v < e.target {
                edges.push((v, i, e.weight));
            }
        }
    }
    for a in 0..edges.len() {
        for b in a..edges.len() {
            let removed: Vec<_> = if a == b {
                vec![edges[a]]
            } else {
                vec![edges[a], edges[b]]
            };
            if removed.iter().map(|r| r.2).sum::<EdgeWeight>() != lambda {
                continue;
            }
            let skip: HashSet<(VertexId, usize)> = removed
                .iter()
                .flat_map(|&(v, i, _)| {
                    let r = cactus.reverse_slot(v, i as u32) as usize;
                    let t = cactus.edge_target(v, i as u32);
                    [(v, i), (t, r)]
                })
                .collect();
            let mut seen: HashSet<VertexId> = HashSet::from([verts[0]]);
            let mut stack = vec![verts[0]];
            while let Some(u) = stack.pop() {
                for (i, e) in cactus.edges_of(u).iter().enumerate() {
                    if !skip.contains(&(u, i)) && seen.insert(e.target) {
                        stack.push(e.target);
                    }
                }
            }
            if seen.len() == verts.len() {
                continue;
            }
            let zero_reached = seen.contains(&cactus.position(0));
            let mut side = BTreeSet::new();
            for &v in &verts {
                if seen.contains(&v) != zero_reached {
                    side.extend(cactus.contained(v).iter().copied());
                }
            }
            if !side.is_empty() {
                out.insert(side);
            }
        }
    }
    out
}

fn assert_cactus_represents_all_cuts(g: &MutableGraph) {
    let engine = EnumerativeCactus;
    let result = engine.find_all_mincuts(g, None).unwrap();
    result.cactus.check_consistency().unwrap();
    if result.cut == 0 {
        assert_eq!(result.cactus.num_vertices(), 2);
        return;
    }
    assert_eq!(
        cactus_family(&result.cactus, result.cut),
        brute_force_family(g, result.cut),
    );
}

#[test]
fn test_engine_families_on_fixed_graphs() {
    let cases: Vec<(usize, Vec<(VertexId, VertexId, EdgeWeight)>)> = vec![
        // path
        (5, vec![(0, 1, 2), (1, 2, 2), (2, 3, 2), (3, 4, 2)]),
        // cycle
        (6, (0..6).map(|i| (i, (i + 1) % 6, 1)).collect()),
        // theta graph: cycle with a heavy chord path
        (
            6,
            vec![
                (0, 1, 1),
                (1, 2, 1),
                (2, 3, 1),
                (3, 4, 1),
                (4, 5, 1),
                (5, 0, 1),
                (0, 3, 2),
            ],
        ),
        // barbell
        (
            6,
            vec![
                (0, 1, 1),
                (1, 2, 1),
                (2, 0, 1),
                (3, 4, 1),
                (4, 5, 1),
                (5, 3, 1),
                (2, 3, 2),
            ],
        ),
        // wheel-ish
        (
            5,
            vec![
                (0, 1, 1),
                (1, 2, 1),
                (2, 3, 1),
                (3, 4, 1),
                (4, 1, 1),
                (0, 2, 1),
            ],
        ),
    ];
    for (n, edges) in cases {
        let g = MutableGraph::from_edges(n, &edges).unwrap();
        assert_cactus_represents_all_cuts(&g);
    }
}

#[test]
fn test_engine_families_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _round in 0..40 {
        let n = rng.gen_range(4..9) as usize;
        let mut g = MutableGraph::new(n);
        // random connected-ish graph: spanning path plus random extras
        for i in 1..n {
            g.new_edge_order((i - 1) as VertexId, i as VertexId, rng.gen_range(1..4))
                .unwrap();
        }
        let extras = rng.gen_range(0..=n);
        for _ in 0..extras {
            let s = rng.gen_range(0..n as VertexId);
            let t = rng.gen_range(0..n as VertexId);
            if s != t {
                g.new_edge_order(s, t, rng.gen_range(1..4)).unwrap();
            }
        }
        assert_cactus_represents_all_cuts(&g);
    }
}

#[test]
fn test_dynamic_family_stays_correct_under_contractions() {
    // insertion sequence on a cycle that only takes the contraction path;
    // after every step the cactus family must equal the oracle family
    let n = 8;
    let edges: Vec<_> = (0..n)
        .map(|i| (i as VertexId, ((i + 1) % n) as VertexId, 1))
        .collect();
    let g = MutableGraph::from_edges(n, &edges).unwrap();
    let mut mincut = DynamicMinCut::new(MinCutConfig::default());
    assert_eq!(mincut.initialize(g).unwrap(), 2);

    for (s, t) in [(1, 3), (4, 6)] {
        let cut = mincut.add_edge(s, t, 1).unwrap();
        assert_eq!(cut, 2);
        let cactus = mincut.current_cactus().unwrap();
        cactus.check_consistency().unwrap();
        assert_eq!(
            cactus_family(cactus, cut),
            brute_force_family(mincut.original_graph().unwrap(), cut),
        );
    }
}

#[test]
fn test_cactus_positions_cover_all_originals() {
    let g = MutableGraph::from_edges(
        7,
        &[
            (0, 1, 1),
            (1, 2, 1),
            (2, 3, 1),
            (3, 0, 1),
            (3, 4, 2),
            (4, 5, 1),
            (5, 6, 1),
            (6, 4, 1),
        ],
    )
    .unwrap();
    let engine = EnumerativeCactus;
    let result = engine.find_all_mincuts(&g, None).unwrap();
    for v in 0..7 {
        assert!(result.cactus.is_live(result.cactus.position(v)));
    }
    // contained lists partition the originals
    let mut all: Vec<VertexId> = result
        .cactus
        .live_vertices()
        .flat_map(|v| result.cactus.contained(v).to_vec())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..7).collect::<Vec<_>>());
}

#[test]
fn test_empty_junction_vertices_carry_no_originals() {
    // K4's cactus needs an empty junction; its contained list is empty and
    // the sparse contraction heuristic must refuse regions containing it
    let g = MutableGraph::from_edges(
        4,
        &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)],
    )
    .unwrap();
    let engine = EnumerativeCactus;
    let result = engine.find_all_mincuts(&g, None).unwrap();
    let empty: Vec<VertexId> = result
        .cactus
        .live_vertices()
        .filter(|&v| result.cactus.num_contained(v) == 0)
        .collect();
    assert_eq!(empty.len(), 1);
    assert!(result.cactus.degree(empty[0]) >= 3);
}
