//! Global minimum cut by maximum-adjacency orderings
//!
//! Repeated MA-ordering phases in the Nagamochi-Ono-Ibaraki / Stoer-Wagner
//! family: each phase orders the vertices by total adjacency weight into the
//! growing set with a lazy-deletion heap, records the cut of the phase (the
//! weighted degree of the last vertex) and contracts the last two vertices.
//! Exact for non-negative integer weights; returns 0 for disconnected input.

use std::collections::{BinaryHeap, HashMap};

use crate::graph::{EdgeWeight, MutableGraph};

/// Value of the global minimum cut of `g`.
///
/// Graphs with fewer than two live super-vertices have no cut; 0 is
/// returned for those as well as for disconnected graphs.
pub fn minimum_cut(g: &MutableGraph) -> EdgeWeight {
    let verts: Vec<_> = g.live_vertices().collect();
    let n = verts.len();
    if n < 2 {
        return 0;
    }
    let index: HashMap<_, _> = verts
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();

    // adjacency with parallel edges merged
    let mut adj: Vec<HashMap<usize, EdgeWeight>> = vec![HashMap::new(); n];
    for (ui, &u) in verts.iter().enumerate() {
        for e in g.edges_of(u) {
            let vi = index[&e.target];
            *adj[ui].entry(vi).or_insert(0) += e.weight;
        }
    }

    let mut merged = vec![false; n];
    let mut active = n;
    let mut best = EdgeWeight::MAX;

    while active > 1 {
        let start = match (0..n).find(|&i| !merged[i]) {
            Some(i) => i,
            None => break,
        };

        // one MA-ordering phase
        let mut weight_to_a = vec![0 as EdgeWeight; n];
        let mut in_a = vec![false; n];
        let mut heap: BinaryHeap<(EdgeWeight, usize)> = BinaryHeap::new();
        in_a[start] = true;
        for (&x, &w) in &adj[start] {
            weight_to_a[x] += w;
            heap.push((weight_to_a[x], x));
        }
        let mut last = start;
        let mut second_last = start;
        let mut cut_of_phase = 0;
        let mut added = 1;
        while added < active {
            let next = loop {
                match heap.pop() {
                    Some((w, x)) => {
                        if !in_a[x] && !merged[x] && w == weight_to_a[x] {
                            break Some((x, w));
                        }
                    }
                    None => break None,
                }
            };
            let Some((x, w)) = next else {
                // remaining vertices are unreachable: the graph is
                // disconnected and the minimum cut is 0
                return 0;
            };
            in_a[x] = true;
            added += 1;
            second_last = last;
            last = x;
            cut_of_phase = w;
            for (&y, &wy) in &adj[x] {
                if !in_a[y] && !merged[y] {
                    weight_to_a[y] += wy;
                    heap.push((weight_to_a[y], y));
                }
            }
        }

        best = best.min(cut_of_phase);

        // contract `last` into `second_last`
        let absorbed: Vec<(usize, EdgeWeight)> =
            adj[last].iter().map(|(&x, &w)| (x, w)).collect();
        for (x, w) in absorbed {
            adj[x].remove(&last);
            if x != second_last {
                *adj[second_last].entry(x).or_insert(0) += w;
                *adj[x].entry(second_last).or_insert(0) += w;
            }
        }
        adj[last].clear();
        merged[last] = true;
        active -= 1;
    }

    best
}
