//! Mutable graph store shared by the live graph and the cactus
//!
//! Both the evolving input graph G and the cactus C are instances of
//! [`MutableGraph`]: an arena of super-vertices with slot-addressed edge
//! lists. The structure supports:
//! - edge insertion that keeps existing edge slots stable
//! - edge deletion by (vertex, slot) addressing
//! - vertex-set contraction with parallel-edge merging
//! - sparse-target contraction that never rescans the surviving hub
//! - a position map from original vertex ids to current super-vertices

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{MinCutError, Result};

/// Identifier of a (super-)vertex in the arena
pub type VertexId = u32;

/// Slot index into a vertex's edge list
pub type EdgeIndex = u32;

/// Non-negative integer edge weight
pub type EdgeWeight = u64;

/// One direction of an undirected edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// The super-vertex this half-edge points at
    pub target: VertexId,
    /// Weight of the undirected edge
    pub weight: EdgeWeight,
    /// Slot of the twin half-edge in the target's edge list
    pub reverse: EdgeIndex,
}

#[derive(Debug, Clone, Default)]
struct VertexData {
    edges: Vec<HalfEdge>,
    contained: Vec<VertexId>,
}

/// Summary statistics over the live super-vertices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of live super-vertices
    pub num_vertices: usize,
    /// Number of undirected edges
    pub num_edges: usize,
    /// Sum of all edge weights
    pub total_weight: u64,
    /// Minimum unweighted degree
    pub min_degree: usize,
    /// Maximum unweighted degree
    pub max_degree: usize,
    /// Average unweighted degree
    pub avg_degree: f64,
}

/// Undirected weighted multigraph with contraction support
#[derive(Debug, Clone)]
pub struct MutableGraph {
    vertices: Vec<VertexData>,
    alive: Vec<bool>,
    /// original vertex id -> current super-vertex
    positions: Vec<VertexId>,
    num_alive: usize,
    num_edges: usize,
}

impl MutableGraph {
    /// Create a graph of `n` isolated vertices, each containing itself
    pub fn new(n: usize) -> Self {
        let vertices = (0..n)
            .map(|i| VertexData {
                edges: Vec::new(),
                contained: vec![i as VertexId],
            })
            .collect();
        Self {
            vertices,
            alive: vec![true; n],
            positions: (0..n as VertexId).collect(),
            num_alive: n,
            num_edges: 0,
        }
    }

    /// Create a graph from an edge list over vertices `[0, n)`
    pub fn from_edges(n: usize, edges: &[(VertexId, VertexId, EdgeWeight)]) -> Result<Self> {
        let mut g = Self::new(n);
        for &(s, t, w) in edges {
            g.new_edge_order(s, t, w)?;
        }
        Ok(g)
    }

    /// Create an edgeless graph whose super-vertices contain the given
    /// groups of original ids from `[0, total)`. Groups may be empty; the
    /// non-empty groups must partition `[0, total)`.
    pub fn from_groups(total: usize, groups: Vec<Vec<VertexId>>) -> Result<Self> {
        let mut positions = vec![VertexId::MAX; total];
        let vertices: Vec<VertexData> = groups
            .into_iter()
            .enumerate()
            .map(|(i, contained)| {
                for &orig in &contained {
                    positions[orig as usize] = i as VertexId;
                }
                VertexData {
                    edges: Vec::new(),
                    contained,
                }
            })
            .collect();
        if positions.iter().any(|&p| p == VertexId::MAX) {
            return Err(MinCutError::InternalError(
                "groups do not cover all original vertices".to_string(),
            ));
        }
        let n = vertices.len();
        Ok(Self {
            vertices,
            alive: vec![true; n],
            positions,
            num_alive: n,
            num_edges: 0,
        })
    }

    /// Number of live super-vertices
    pub fn num_vertices(&self) -> usize {
        self.num_alive
    }

    /// Number of undirected edges
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Number of original vertices the graph was created with
    pub fn total_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Whether `v` is a live super-vertex
    pub fn is_live(&self, v: VertexId) -> bool {
        (v as usize) < self.alive.len() && self.alive[v as usize]
    }

    /// Iterate over the live super-vertices
    pub fn live_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| i as VertexId)
    }

    /// Current super-vertex of original vertex `orig`
    pub fn position(&self, orig: VertexId) -> VertexId {
        self.positions[orig as usize]
    }

    /// Original vertex ids contained in super-vertex `v`
    pub fn contained(&self, v: VertexId) -> &[VertexId] {
        &self.vertices[v as usize].contained
    }

    /// Number of original vertices contained in `v`
    pub fn num_contained(&self, v: VertexId) -> usize {
        self.vertices[v as usize].contained.len()
    }

    /// Unweighted degree (edge-list length) of `v`
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices[v as usize].edges.len()
    }

    /// Sum of edge weights incident to `v`
    pub fn weighted_degree(&self, v: VertexId) -> EdgeWeight {
        self.vertices[v as usize]
            .edges
            .iter()
            .map(|e| e.weight)
            .sum()
    }

    /// Half-edges of `v`
    pub fn edges_of(&self, v: VertexId) -> &[HalfEdge] {
        &self.vertices[v as usize].edges
    }

    /// Target of the half-edge at `(v, slot)`
    pub fn edge_target(&self, v: VertexId, slot: EdgeIndex) -> VertexId {
        self.vertices[v as usize].edges[slot as usize].target
    }

    /// Weight of the half-edge at `(v, slot)`
    pub fn edge_weight(&self, v: VertexId, slot: EdgeIndex) -> EdgeWeight {
        self.vertices[v as usize].edges[slot as usize].weight
    }

    /// Slot of the twin half-edge of `(v, slot)` in the target's list
    pub fn reverse_slot(&self, v: VertexId, slot: EdgeIndex) -> EdgeIndex {
        self.vertices[v as usize].edges[slot as usize].reverse
    }

    /// Slot of the first half-edge from `s` to `t`, if any
    pub fn edge_slot(&self, s: VertexId, t: VertexId) -> Option<EdgeIndex> {
        self.vertices[s as usize]
            .edges
            .iter()
            .position(|e| e.target == t)
            .map(|i| i as EdgeIndex)
    }

    fn check_live(&self, v: VertexId) -> Result<()> {
        if !self.is_live(v) {
            return Err(MinCutError::InvalidVertex(v));
        }
        Ok(())
    }

    /// Insert an undirected edge, keeping all existing edge slots stable.
    /// Self-loops are ignored.
    pub fn new_edge_order(&mut self, s: VertexId, t: VertexId, w: EdgeWeight) -> Result<()> {
        self.check_live(s)?;
        self.check_live(t)?;
        if s == t {
            return Ok(());
        }
        let s_slot = self.vertices[s as usize].edges.len() as EdgeIndex;
        let t_slot = self.vertices[t as usize].edges.len() as EdgeIndex;
        self.vertices[s as usize].edges.push(HalfEdge {
            target: t,
            weight: w,
            reverse: t_slot,
        });
        self.vertices[t as usize].edges.push(HalfEdge {
            target: s,
            weight: w,
            reverse: s_slot,
        });
        self.num_edges += 1;
        Ok(())
    }

    /// Remove the half-edge at `(v, slot)` and repair the twin pointer of
    /// whichever edge the swap moved into the vacated slot.
    fn remove_half(&mut self, v: VertexId, slot: usize) {
        self.vertices[v as usize].edges.swap_remove(slot);
        if slot < self.vertices[v as usize].edges.len() {
            let moved = self.vertices[v as usize].edges[slot];
            self.vertices[moved.target as usize].edges[moved.reverse as usize].reverse =
                slot as EdgeIndex;
        }
    }

    /// Delete the undirected edge at `(v, slot)`, returning its weight
    pub fn delete_edge(&mut self, v: VertexId, slot: EdgeIndex) -> Result<EdgeWeight> {
        self.check_live(v)?;
        let slot = slot as usize;
        if slot >= self.vertices[v as usize].edges.len() {
            return Err(MinCutError::EdgeNotFound(v, v));
        }
        let HalfEdge {
            target,
            weight,
            reverse,
        } = self.vertices[v as usize].edges[slot];
        self.remove_half(v, slot);
        self.remove_half(target, reverse as usize);
        self.num_edges -= 1;
        Ok(weight)
    }

    /// Canonical vertex-set contraction: merge `set` into one surviving
    /// super-vertex, summing parallel edge weights and dropping self-loops.
    /// Returns the survivor.
    pub fn contract_vertex_set(&mut self, set: &HashSet<VertexId>) -> Result<VertexId> {
        let mut members: Vec<VertexId> = set
            .iter()
            .copied()
            .filter(|&v| self.is_live(v))
            .collect();
        members.sort_unstable();
        let survivor = match members.first() {
            None => return Err(MinCutError::EmptyGraph),
            Some(&first) if members.len() == 1 => return Ok(first),
            Some(&first) => first,
        };
        let member_set: HashSet<VertexId> = members.iter().copied().collect();

        // Aggregate member->outside weights; count removed edges.
        let mut agg: BTreeMap<VertexId, EdgeWeight> = BTreeMap::new();
        let mut internal_halves = 0usize;
        let mut cross_edges = 0usize;
        for &m in &members {
            for e in &self.vertices[m as usize].edges {
                if member_set.contains(&e.target) {
                    internal_halves += 1;
                } else {
                    cross_edges += 1;
                    *agg.entry(e.target).or_insert(0) += e.weight;
                }
            }
        }

        // Strip member edges from every outside neighbor, repairing the twin
        // pointers of edges the compaction moves.
        for &x in agg.keys() {
            let mut i = 0;
            while i < self.vertices[x as usize].edges.len() {
                if member_set.contains(&self.vertices[x as usize].edges[i].target) {
                    self.remove_half(x, i);
                } else {
                    i += 1;
                }
            }
        }

        // Rebuild the survivor with one combined edge per outside neighbor.
        let mut contained = Vec::new();
        for &m in &members {
            contained.append(&mut self.vertices[m as usize].contained);
            self.vertices[m as usize].edges.clear();
            if m != survivor {
                self.alive[m as usize] = false;
            }
        }
        for &orig in &contained {
            self.positions[orig as usize] = survivor;
        }
        self.vertices[survivor as usize].contained = contained;

        for (&x, &w) in &agg {
            let s_slot = self.vertices[survivor as usize].edges.len() as EdgeIndex;
            let x_slot = self.vertices[x as usize].edges.len() as EdgeIndex;
            self.vertices[survivor as usize].edges.push(HalfEdge {
                target: x,
                weight: w,
                reverse: x_slot,
            });
            self.vertices[x as usize].edges.push(HalfEdge {
                target: survivor,
                weight: w,
                reverse: s_slot,
            });
        }

        self.num_alive -= members.len() - 1;
        self.num_edges -= internal_halves / 2 + cross_edges;
        self.num_edges += agg.len();
        Ok(survivor)
    }

    /// Fold the sparse endpoint of the edge at `(hub, slot)` into `hub`.
    /// Only the sparse endpoint's edge list is scanned; parallel edges that
    /// result are left unmerged.
    pub fn contract_edge_sparse_target(&mut self, hub: VertexId, slot: EdgeIndex) -> Result<()> {
        self.check_live(hub)?;
        let slot = slot as usize;
        if slot >= self.vertices[hub as usize].edges.len() {
            return Err(MinCutError::EdgeNotFound(hub, hub));
        }
        let v = self.vertices[hub as usize].edges[slot].target;
        let reverse = self.vertices[hub as usize].edges[slot].reverse;
        self.remove_half(hub, slot);
        self.remove_half(v, reverse as usize);
        self.num_edges -= 1;
        self.fold_into(hub, v);
        Ok(())
    }

    /// Fold `v` into `hub` when no edge joins them
    pub fn contract_sparse_target_no_edge(&mut self, hub: VertexId, v: VertexId) -> Result<()> {
        self.check_live(hub)?;
        self.check_live(v)?;
        if hub == v {
            return Ok(());
        }
        self.fold_into(hub, v);
        Ok(())
    }

    /// Move all of `v`'s edges and contents onto `hub` and kill `v`.
    /// Edges between `v` and `hub` must already be gone or become self-loops
    /// to drop.
    fn fold_into(&mut self, hub: VertexId, v: VertexId) {
        // Pop from the live list: twin repairs from earlier iterations may
        // rewrite the reverse slots of edges still waiting here.
        while let Some(&e) = self.vertices[v as usize].edges.last() {
            if e.target == hub {
                // would become a self-loop; drop the twin from hub's list
                self.remove_half(hub, e.reverse as usize);
                self.vertices[v as usize].edges.pop();
                self.num_edges -= 1;
                continue;
            }
            let hub_slot = self.vertices[hub as usize].edges.len() as EdgeIndex;
            self.vertices[e.target as usize].edges[e.reverse as usize].target = hub;
            self.vertices[e.target as usize].edges[e.reverse as usize].reverse = hub_slot;
            self.vertices[hub as usize].edges.push(HalfEdge {
                target: e.target,
                weight: e.weight,
                reverse: e.reverse,
            });
            self.vertices[v as usize].edges.pop();
        }
        let mut contained = std::mem::take(&mut self.vertices[v as usize].contained);
        for &orig in &contained {
            self.positions[orig as usize] = hub;
        }
        self.vertices[hub as usize].contained.append(&mut contained);
        self.alive[v as usize] = false;
        self.num_alive -= 1;
    }

    /// Connected components over live super-vertices: (count, label per
    /// arena slot; dead slots keep `u32::MAX`)
    pub fn connected_components(&self) -> (usize, Vec<u32>) {
        let mut labels = vec![u32::MAX; self.vertices.len()];
        let mut count = 0;
        for start in self.live_vertices() {
            if labels[start as usize] != u32::MAX {
                continue;
            }
            let label = count as u32;
            count += 1;
            let mut queue = VecDeque::from([start]);
            labels[start as usize] = label;
            while let Some(u) = queue.pop_front() {
                for e in &self.vertices[u as usize].edges {
                    if labels[e.target as usize] == u32::MAX {
                        labels[e.target as usize] = label;
                        queue.push_back(e.target);
                    }
                }
            }
        }
        (count, labels)
    }

    /// Weight of the cut between `side` and the remaining live vertices
    pub fn edge_cut(&self, side: &HashSet<VertexId>) -> EdgeWeight {
        let mut cut = 0;
        for &v in side {
            if !self.is_live(v) {
                continue;
            }
            for e in &self.vertices[v as usize].edges {
                if !side.contains(&e.target) {
                    cut += e.weight;
                }
            }
        }
        cut
    }

    /// Summary statistics
    pub fn stats(&self) -> GraphStats {
        let mut min_degree = usize::MAX;
        let mut max_degree = 0;
        let mut total_weight = 0u64;
        let mut half_edges = 0usize;
        for v in self.live_vertices() {
            let d = self.degree(v);
            min_degree = min_degree.min(d);
            max_degree = max_degree.max(d);
            half_edges += d;
            total_weight += self.weighted_degree(v);
        }
        if self.num_alive == 0 {
            min_degree = 0;
        }
        GraphStats {
            num_vertices: self.num_alive,
            num_edges: self.num_edges,
            total_weight: total_weight / 2,
            min_degree,
            max_degree,
            avg_degree: if self.num_alive == 0 {
                0.0
            } else {
                half_edges as f64 / self.num_alive as f64
            },
        }
    }

    /// Debug check: every twin pointer round-trips and positions point at
    /// live vertices. Used by tests.
    #[doc(hidden)]
    pub fn check_consistency(&self) -> Result<()> {
        for v in self.live_vertices() {
            for (i, e) in self.vertices[v as usize].edges.iter().enumerate() {
                if !self.is_live(e.target) {
                    return Err(MinCutError::InternalError(format!(
                        "edge ({v},{i}) points at dead vertex {}",
                        e.target
                    )));
                }
                let twin = self.vertices[e.target as usize]
                    .edges
                    .get(e.reverse as usize)
                    .copied()
                    .ok_or_else(|| {
                        MinCutError::InternalError(format!("edge ({v},{i}) twin slot missing"))
                    })?;
                if twin.target != v || twin.reverse as usize != i || twin.weight != e.weight {
                    return Err(MinCutError::InternalError(format!(
                        "edge ({v},{i}) twin mismatch"
                    )));
                }
            }
        }
        for (orig, &p) in self.positions.iter().enumerate() {
            if !self.is_live(p) {
                return Err(MinCutError::InternalError(format!(
                    "position of {orig} points at dead vertex {p}"
                )));
            }
        }
        Ok(())
    }
}
