//! Maximum flow / minimum s-t cut
//!
//! Dinic's algorithm over the live super-vertices of a [`MutableGraph`]:
//! level-graph BFS followed by blocking-flow DFS with iteration pointers.
//! An undirected edge of weight w becomes an arc pair with capacity w in
//! each direction. The bounded variant stops as soon as the accumulated
//! flow reaches the cap, which is all the deletion handler needs to know.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::error::{MinCutError, Result};
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

#[derive(Debug, Clone, Copy)]
struct FlowArc {
    to: u32,
    cap: EdgeWeight,
}

/// A per-call flow network built from the current graph.
///
/// One instance corresponds to one flow-problem id; solver state never
/// leaks across calls.
pub struct FlowNetwork {
    verts: Vec<VertexId>,
    index: HashMap<VertexId, u32>,
    arcs: Vec<FlowArc>,
    heads: Vec<Vec<u32>>,
    level: Vec<u32>,
    iter: Vec<usize>,
}

impl FlowNetwork {
    /// Build the arc-pair network from the live super-vertices of `g`
    pub fn from_graph(g: &MutableGraph) -> Self {
        let verts: Vec<VertexId> = g.live_vertices().collect();
        let index: HashMap<VertexId, u32> = verts
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as u32))
            .collect();
        let n = verts.len();
        let mut arcs = Vec::new();
        let mut heads = vec![Vec::new(); n];
        for (ui, &u) in verts.iter().enumerate() {
            for e in g.edges_of(u) {
                if u < e.target {
                    let vi = index[&e.target];
                    heads[ui].push(arcs.len() as u32);
                    arcs.push(FlowArc {
                        to: vi,
                        cap: e.weight,
                    });
                    heads[vi as usize].push(arcs.len() as u32);
                    arcs.push(FlowArc {
                        to: ui as u32,
                        cap: e.weight,
                    });
                }
            }
        }
        Self {
            verts,
            index,
            arcs,
            heads,
            level: vec![u32::MAX; n],
            iter: vec![0; n],
        }
    }

    /// Number of network nodes
    pub fn num_nodes(&self) -> usize {
        self.verts.len()
    }

    /// Dense index of a super-vertex
    pub fn dense_index(&self, v: VertexId) -> Option<usize> {
        self.index.get(&v).map(|&i| i as usize)
    }

    /// Super-vertex at a dense index
    pub fn vertex_at(&self, i: usize) -> VertexId {
        self.verts[i]
    }

    /// Dense targets of residual arcs out of dense node `u`
    pub fn residual_out(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.heads[u]
            .iter()
            .filter(|&&a| self.arcs[a as usize].cap > 0)
            .map(|&a| self.arcs[a as usize].to as usize)
    }

    fn bfs_levels(&mut self, s: u32, t: u32) -> bool {
        self.level.fill(u32::MAX);
        self.level[s as usize] = 0;
        let mut queue = VecDeque::from([s]);
        while let Some(u) = queue.pop_front() {
            for &a in &self.heads[u as usize] {
                let arc = self.arcs[a as usize];
                if arc.cap > 0 && self.level[arc.to as usize] == u32::MAX {
                    self.level[arc.to as usize] = self.level[u as usize] + 1;
                    queue.push_back(arc.to);
                }
            }
        }
        self.level[t as usize] != u32::MAX
    }

    fn dfs_augment(&mut self, u: u32, t: u32, pushed: EdgeWeight) -> EdgeWeight {
        if u == t {
            return pushed;
        }
        while self.iter[u as usize] < self.heads[u as usize].len() {
            let a = self.heads[u as usize][self.iter[u as usize]] as usize;
            let FlowArc { to, cap } = self.arcs[a];
            if cap > 0 && self.level[to as usize] == self.level[u as usize] + 1 {
                let d = self.dfs_augment(to, t, pushed.min(cap));
                if d > 0 {
                    self.arcs[a].cap -= d;
                    self.arcs[a ^ 1].cap += d;
                    return d;
                }
            }
            self.iter[u as usize] += 1;
        }
        0
    }

    /// Run max flow from `s` to `t`. With `cap = Some(c)` the search stops
    /// as soon as the accumulated flow reaches c.
    pub fn max_flow(
        &mut self,
        s: VertexId,
        t: VertexId,
        cap: Option<EdgeWeight>,
        fpid: u64,
    ) -> Result<EdgeWeight> {
        let s = *self
            .index
            .get(&s)
            .ok_or(MinCutError::InvalidVertex(s))?;
        let t = *self
            .index
            .get(&t)
            .ok_or(MinCutError::InvalidVertex(t))?;
        let mut flow: EdgeWeight = 0;
        'phases: while self.bfs_levels(s, t) {
            self.iter.fill(0);
            loop {
                if let Some(c) = cap {
                    if flow >= c {
                        break 'phases;
                    }
                }
                let pushed = self.dfs_augment(s, t, EdgeWeight::MAX);
                if pushed == 0 {
                    break;
                }
                flow += pushed;
            }
        }
        trace!(fpid, flow, bounded = cap.is_some(), "flow problem solved");
        Ok(flow)
    }

    /// Super-vertices on the source side of the final residual graph
    pub fn source_side(&self, s: VertexId) -> Vec<VertexId> {
        let Some(&s) = self.index.get(&s) else {
            return Vec::new();
        };
        let n = self.verts.len();
        let mut seen = vec![false; n];
        seen[s as usize] = true;
        let mut queue = VecDeque::from([s as usize]);
        let mut side = vec![self.verts[s as usize]];
        while let Some(u) = queue.pop_front() {
            for v in self.residual_out(u) {
                if !seen[v] {
                    seen[v] = true;
                    side.push(self.verts[v]);
                    queue.push_back(v);
                }
            }
        }
        side
    }
}

/// Solve a max-flow / min-s-t-cut problem over `terminals`.
///
/// `src_idx` selects the source among the terminals; the sink is the first
/// other terminal. Returns the achieved flow and the source-side vertex set
/// of the final residual graph.
pub fn solve_max_flow_min_cut(
    g: &MutableGraph,
    terminals: &[VertexId],
    src_idx: usize,
    cap: Option<EdgeWeight>,
    fpid: u64,
) -> Result<(EdgeWeight, Vec<VertexId>)> {
    let &s = terminals
        .get(src_idx)
        .ok_or_else(|| MinCutError::InternalError("source index out of range".to_string()))?;
    let &t = terminals
        .iter()
        .find(|&&v| v != s)
        .ok_or_else(|| MinCutError::InternalError("no sink terminal".to_string()))?;
    let mut net = FlowNetwork::from_graph(g);
    let flow = net.max_flow(s, t, cap, fpid)?;
    Ok((flow, net.source_side(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    #[test]
    fn test_path_flow() {
        let g = MutableGraph::from_edges(4, &[(0, 1, 3), (1, 2, 1), (2, 3, 5)]).unwrap();
        let (flow, side) = solve_max_flow_min_cut(&g, &[0, 3], 0, None, 1).unwrap();
        assert_eq!(flow, 1);
        assert!(side.contains(&0));
        assert!(!side.contains(&3));
    }

    #[test]
    fn test_parallel_paths() {
        // two disjoint 0->3 paths of bottleneck 2 and 3
        let g = MutableGraph::from_edges(
            4,
            &[(0, 1, 2), (1, 3, 4), (0, 2, 3), (2, 3, 3)],
        )
        .unwrap();
        let (flow, _) = solve_max_flow_min_cut(&g, &[0, 3], 0, None, 2).unwrap();
        assert_eq!(flow, 5);
    }

    #[test]
    fn test_disconnected_zero_flow() {
        let g = MutableGraph::from_edges(4, &[(0, 1, 2), (2, 3, 2)]).unwrap();
        let (flow, side) = solve_max_flow_min_cut(&g, &[0, 3], 0, None, 3).unwrap();
        assert_eq!(flow, 0);
        assert_eq!(side.len(), 2);
    }

    #[test]
    fn test_bounded_early_exit() {
        // K4 with unit weights: true 0-3 flow is 3, cap 2 stops early
        let g = MutableGraph::from_edges(
            4,
            &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)],
        )
        .unwrap();
        let (flow, _) = solve_max_flow_min_cut(&g, &[0, 3], 0, Some(2), 4).unwrap();
        assert!(flow >= 2);
        let (full, _) = solve_max_flow_min_cut(&g, &[0, 3], 0, None, 5).unwrap();
        assert_eq!(full, 3);
    }

    #[test]
    fn test_undirected_both_directions() {
        let g = MutableGraph::from_edges(3, &[(0, 1, 2), (1, 2, 2)]).unwrap();
        let (a, _) = solve_max_flow_min_cut(&g, &[0, 2], 0, None, 6).unwrap();
        let (b, _) = solve_max_flow_min_cut(&g, &[2, 0], 0, None, 7).unwrap();
        assert_eq!(a, 2);
        assert_eq!(b, 2);
    }

    #[test]
    fn test_zero_weight_edges_carry_nothing() {
        let g = MutableGraph::from_edges(3, &[(0, 1, 0), (1, 2, 4)]).unwrap();
        let (flow, _) = solve_max_flow_min_cut(&g, &[0, 2], 0, None, 8).unwrap();
        assert_eq!(flow, 0);
    }
}
