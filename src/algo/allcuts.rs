//! Default all-minimum-cuts engine
//!
//! Builds the cactus in three stages:
//! 1. enumerate every global minimum cut: for each candidate sink the set of
//!    minimum s-t cuts is exactly the family of closed sets over the SCC
//!    condensation of the Dinic residual graph, and the global family is the
//!    union over sinks (at most n(n-1)/2 distinct cuts exist);
//! 2. group vertices into atoms (separated by no cut) and re-express every
//!    cut side over atoms, oriented away from the reference vertex;
//! 3. synthesize the cactus recursively: inclusion-maximal sides become
//!    bridges, crossing families become cycles whose parts are ordered by
//!    2-part co-occurrence, and everything else recurses into a part.
//!
//! The synthesis validates that every enumerated cut is realized by the
//! finished structure; a cut it cannot place is an internal error, never a
//! silent drop.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::algo::flow::FlowNetwork;
use crate::algo::noi;
use crate::algo::traits::{CactusEngine, CactusResult};
use crate::error::{MinCutError, Result};
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// Cut side as a set of atom (or dense-vertex) ids
type Side = BTreeSet<u32>;

/// Enumeration-based cactus engine
pub struct EnumerativeCactus;

impl CactusEngine for EnumerativeCactus {
    fn find_all_mincuts(
        &self,
        g: &MutableGraph,
        hint: Option<EdgeWeight>,
    ) -> Result<CactusResult> {
        let verts: Vec<VertexId> = g.live_vertices().collect();
        if verts.is_empty() {
            return Err(MinCutError::EmptyGraph);
        }
        let total = g.total_vertices();
        if verts.len() == 1 {
            let cactus =
                MutableGraph::from_groups(total, vec![g.contained(verts[0]).to_vec()])?;
            return Ok(CactusResult {
                cut: 0,
                cactus,
                balanced: false,
            });
        }

        let (ncomp, labels) = g.connected_components();
        if ncomp > 1 {
            return split_cactus(g, &verts, |v| labels[v as usize] == labels[verts[0] as usize]);
        }

        let lambda = match hint {
            Some(l) => l,
            None => noi::minimum_cut(g),
        };
        if lambda == 0 {
            // connected only through zero-weight edges; split along
            // positive-weight reachability
            let side = positive_reach(g, verts[0]);
            return split_cactus(g, &verts, |v| side.contains(&v));
        }

        let dense: HashMap<VertexId, u32> = verts
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i as u32))
            .collect();
        let family = enumerate_mincuts(g, &verts, &dense, lambda)?;
        debug!(
            lambda,
            cuts = family.len(),
            vertices = verts.len(),
            "enumerated minimum cuts"
        );

        let balanced = family.iter().any(|side| {
            let o: usize = side.iter().map(|&d| g.num_contained(verts[d as usize])).sum();
            3 * o.min(total - o) >= total
        });

        // atoms: classes of dense vertices with identical cut membership
        let mut sig_index: HashMap<Vec<bool>, u32> = HashMap::new();
        let mut atom_of = vec![0u32; verts.len()];
        let mut atom_members: Vec<Vec<u32>> = Vec::new();
        for d in 0..verts.len() as u32 {
            let sig: Vec<bool> = family.iter().map(|side| side.contains(&d)).collect();
            let next = atom_members.len() as u32;
            let a = *sig_index.entry(sig).or_insert(next);
            if a as usize == atom_members.len() {
                atom_members.push(Vec::new());
            }
            atom_of[d as usize] = a;
            atom_members[a as usize].push(d);
        }

        let mut atom_sides: HashSet<Side> = HashSet::new();
        for side in &family {
            atom_sides.insert(side.iter().map(|&d| atom_of[d as usize]).collect());
        }
        let universe: Side = (0..atom_members.len() as u32).collect();
        let sides: Vec<Side> = atom_sides.into_iter().collect();

        let mut synth = Synth {
            lambda,
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        synth.build(&universe, sides)?;

        let groups: Vec<Vec<VertexId>> = synth
            .nodes
            .iter()
            .map(|atoms| {
                atoms
                    .iter()
                    .flat_map(|&a| atom_members[a as usize].iter())
                    .flat_map(|&d| g.contained(verts[d as usize]).iter().copied())
                    .collect()
            })
            .collect();
        let mut cactus = MutableGraph::from_groups(total, groups)?;
        for &(x, y, w) in &synth.edges {
            cactus.new_edge_order(x, y, w)?;
        }
        debug!(
            lambda,
            cactus_vertices = cactus.num_vertices(),
            "cactus synthesized"
        );
        Ok(CactusResult {
            cut: lambda,
            cactus,
            balanced,
        })
    }
}

/// Two-vertex cactus splitting the vertices by `in_first`
fn split_cactus(
    g: &MutableGraph,
    verts: &[VertexId],
    in_first: impl Fn(VertexId) -> bool,
) -> Result<CactusResult> {
    let total = g.total_vertices();
    let mut first = Vec::new();
    let mut rest = Vec::new();
    for &v in verts {
        let bucket = if in_first(v) { &mut first } else { &mut rest };
        bucket.extend(g.contained(v).iter().copied());
    }
    let balanced = 3 * first.len().min(rest.len()) >= total;
    let mut cactus = MutableGraph::from_groups(total, vec![first, rest])?;
    cactus.new_edge_order(0, 1, 0)?;
    Ok(CactusResult {
        cut: 0,
        cactus,
        balanced,
    })
}

/// Super-vertices reachable from `start` over positive-weight edges
fn positive_reach(g: &MutableGraph, start: VertexId) -> HashSet<VertexId> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for e in g.edges_of(u) {
            if e.weight > 0 && seen.insert(e.target) {
                queue.push_back(e.target);
            }
        }
    }
    seen
}

/// Every global minimum cut, as dense-vertex sides not containing vertex 0
fn enumerate_mincuts(
    g: &MutableGraph,
    verts: &[VertexId],
    dense: &HashMap<VertexId, u32>,
    lambda: EdgeWeight,
) -> Result<Vec<Side>> {
    let n = verts.len();
    let mut family: HashSet<Side> = HashSet::new();
    let limit = 2 * n * n + 16;

    for sink in 1..n {
        let mut net = FlowNetwork::from_graph(g);
        let flow = net.max_flow(verts[0], verts[sink], None, sink as u64)?;
        if flow != lambda {
            continue;
        }

        // residual adjacency over dense ids
        let mut forward: Vec<Vec<u32>> = vec![Vec::new(); n];
        for u in 0..n {
            let du = net
                .dense_index(verts[u])
                .ok_or_else(|| MinCutError::InternalError("vertex missing in net".into()))?;
            for v in net.residual_out(du) {
                let dv = dense[&net.vertex_at(v)];
                forward[u].push(dv);
            }
        }

        let scc = condense(&forward);
        let num_scc = scc.iter().map(|&c| c as usize + 1).max().unwrap_or(0);
        let closures = scc_closures(&forward, &scc, num_scc);
        let s_scc = scc[0] as usize;
        let t_scc = scc[sink] as usize;
        if s_scc == t_scc {
            return Err(MinCutError::InternalError(
                "source and sink share a residual component at max flow".to_string(),
            ));
        }

        // all closed SCC sets containing the source closure, avoiding t
        let words = num_scc.div_ceil(64);
        let start = closures[s_scc].clone();
        if bit(&start, t_scc) {
            return Err(MinCutError::InternalError(
                "sink reachable in residual at max flow".to_string(),
            ));
        }
        let mut seen: HashSet<Vec<u64>> = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        while let Some(x) = queue.pop_front() {
            let side: Side = (0..n as u32)
                .filter(|&d| !bit(&x, scc[d as usize] as usize))
                .collect();
            family.insert(side);
            for c in 0..num_scc {
                if bit(&x, c) || bit(&closures[c], t_scc) {
                    continue;
                }
                let mut next = x.clone();
                for w in 0..words {
                    next[w] |= closures[c][w];
                }
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
            if seen.len() > limit {
                return Err(MinCutError::InternalError(
                    "minimum cut family larger than n^2".to_string(),
                ));
            }
        }
    }
    if family.is_empty() {
        return Err(MinCutError::InternalError(
            "no minimum cut found for connected graph".to_string(),
        ));
    }
    Ok(family.into_iter().collect())
}

fn bit(words: &[u64], i: usize) -> bool {
    words[i / 64] >> (i % 64) & 1 == 1
}

/// Kosaraju condensation; returns the SCC id per node, ids in reverse
/// topological order of the condensation (successors have smaller ids).
fn condense(forward: &[Vec<u32>]) -> Vec<u32> {
    let n = forward.len();
    let mut reverse: Vec<Vec<u32>> = vec![Vec::new(); n];
    for (u, outs) in forward.iter().enumerate() {
        for &v in outs {
            reverse[v as usize].push(u as u32);
        }
    }

    // first pass: finishing order on the forward graph
    let mut order = Vec::with_capacity(n);
    let mut state = vec![0u8; n];
    for root in 0..n {
        if state[root] != 0 {
            continue;
        }
        let mut stack = vec![(root as u32, 0usize)];
        state[root] = 1;
        loop {
            let step = {
                let Some(top) = stack.last_mut() else { break };
                let u = top.0;
                if top.1 < forward[u as usize].len() {
                    let v = forward[u as usize][top.1];
                    top.1 += 1;
                    Some((u, v))
                } else {
                    None
                }
            };
            match step {
                Some((_, v)) => {
                    if state[v as usize] == 0 {
                        state[v as usize] = 1;
                        stack.push((v, 0));
                    }
                }
                None => {
                    let (u, _) = stack.pop().unwrap_or((0, 0));
                    order.push(u);
                }
            }
        }
    }

    // second pass: components on the reverse graph
    let mut scc = vec![u32::MAX; n];
    let mut next = 0u32;
    for &root in order.iter().rev() {
        if scc[root as usize] != u32::MAX {
            continue;
        }
        let id = next;
        next += 1;
        let mut stack = vec![root];
        scc[root as usize] = id;
        while let Some(u) = stack.pop() {
            for &v in &reverse[u as usize] {
                if scc[v as usize] == u32::MAX {
                    scc[v as usize] = id;
                    stack.push(v);
                }
            }
        }
    }
    scc
}

/// Forward-reachability closure of every SCC, as bitsets over SCC ids
fn scc_closures(forward: &[Vec<u32>], scc: &[u32], num_scc: usize) -> Vec<Vec<u64>> {
    let words = num_scc.div_ceil(64);
    let mut succ: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); num_scc];
    for (u, outs) in forward.iter().enumerate() {
        for &v in outs {
            if scc[u] != scc[v as usize] {
                succ[scc[u] as usize].insert(scc[v as usize]);
            }
        }
    }
    let mut closures = vec![vec![0u64; words]; num_scc];
    // Kosaraju ids are topological (condensation arcs run low to high), so
    // process sinks first: every successor's closure is already complete.
    for c in (0..num_scc).rev() {
        closures[c][c / 64] |= 1u64 << (c % 64);
        let nexts: Vec<u32> = succ[c].iter().copied().collect();
        for s in nexts {
            let s = s as usize;
            if s <= c {
                continue;
            }
            let (head, tail) = closures.split_at_mut(c + 1);
            for w in 0..words {
                head[c][w] |= tail[s - c - 1][w];
            }
        }
    }
    closures
}

/// Recursive cactus synthesis from the atomized cut family
struct Synth {
    lambda: EdgeWeight,
    nodes: Vec<Vec<u32>>,
    edges: Vec<(VertexId, VertexId, EdgeWeight)>,
}

impl Synth {
    fn new_node(&mut self) -> u32 {
        self.nodes.push(Vec::new());
        (self.nodes.len() - 1) as u32
    }

    fn build(&mut self, universe: &Side, sides: Vec<Side>) -> Result<u32> {
        let root = self.new_node();
        if sides.is_empty() {
            self.nodes[root as usize] = universe.iter().copied().collect();
            return Ok(root);
        }

        let maximal: Vec<usize> = (0..sides.len())
            .filter(|&i| {
                !sides
                    .iter()
                    .enumerate()
                    .any(|(j, s)| j != i && sides[i].is_subset(s) && sides[i] != *s)
            })
            .collect();

        // crossing components among the maximal sides
        let mut comp = vec![usize::MAX; maximal.len()];
        let mut ncomp = 0;
        for i in 0..maximal.len() {
            if comp[i] != usize::MAX {
                continue;
            }
            comp[i] = ncomp;
            let mut queue = VecDeque::from([i]);
            while let Some(x) = queue.pop_front() {
                for y in 0..maximal.len() {
                    if comp[y] == usize::MAX
                        && crosses(&sides[maximal[x]], &sides[maximal[y]])
                    {
                        comp[y] = ncomp;
                        queue.push_back(y);
                    }
                }
            }
            ncomp += 1;
        }

        let mut assigned = vec![false; sides.len()];
        let mut used_atoms: Side = Side::new();

        for c in 0..ncomp {
            let members: Vec<usize> = (0..maximal.len())
                .filter(|&i| comp[i] == c)
                .map(|i| maximal[i])
                .collect();
            if members.len() == 1 {
                let s_idx = members[0];
                assigned[s_idx] = true;
                let s = sides[s_idx].clone();
                let mut sub = Vec::new();
                for (i, side) in sides.iter().enumerate() {
                    if !assigned[i] && side.is_subset(&s) && *side != s {
                        assigned[i] = true;
                        sub.push(side.clone());
                    }
                }
                let r = self.build(&s, sub)?;
                self.edges.push((root, r, self.lambda));
                used_atoms.extend(s.iter().copied());
            } else {
                let r = self.build_ring(root, &sides, &members, &mut assigned)?;
                used_atoms.extend(r.iter().copied());
            }
        }

        if let Some(i) = assigned.iter().position(|a| !a) {
            return Err(MinCutError::InternalError(format!(
                "cut side {:?} not representable",
                sides[i]
            )));
        }

        self.nodes[root as usize] = universe
            .iter()
            .copied()
            .filter(|a| !used_atoms.contains(a))
            .collect();
        Ok(root)
    }

    /// Build one cycle from a crossing component; returns the atoms it used
    fn build_ring(
        &mut self,
        root: u32,
        sides: &[Side],
        members: &[usize],
        assigned: &mut [bool],
    ) -> Result<Side> {
        if self.lambda % 2 != 0 {
            return Err(MinCutError::InternalError(
                "crossing minimum cuts require an even cut value".to_string(),
            ));
        }
        let half = self.lambda / 2;

        let mut z: Side = Side::new();
        for &m in members {
            z.extend(sides[m].iter().copied());
        }

        // crossing closure inside z: arcs of this cycle that the maximal
        // pass missed still refine the parts
        let mut ring: Vec<usize> = members.to_vec();
        let mut in_ring = vec![false; sides.len()];
        for &m in members {
            in_ring[m] = true;
        }
        loop {
            let mut grew = false;
            for i in 0..sides.len() {
                if in_ring[i] || !sides[i].is_subset(&z) {
                    continue;
                }
                if ring.iter().any(|&r| crosses(&sides[i], &sides[r])) {
                    in_ring[i] = true;
                    ring.push(i);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }

        // parts: atoms of z grouped by ring-side membership
        let mut part_of_sig: HashMap<Vec<bool>, u32> = HashMap::new();
        let mut parts: Vec<Side> = Vec::new();
        let mut part_of_atom: HashMap<u32, u32> = HashMap::new();
        for &a in &z {
            let sig: Vec<bool> = ring.iter().map(|&r| sides[r].contains(&a)).collect();
            let next = parts.len() as u32;
            let p = *part_of_sig.entry(sig).or_insert(next);
            if p as usize == parts.len() {
                parts.push(Side::new());
            }
            parts[p as usize].insert(a);
            part_of_atom.insert(a, p);
        }
        let m = parts.len();
        if m < 3 {
            return Err(MinCutError::InternalError(
                "crossing component with fewer than three parts".to_string(),
            ));
        }

        // order parts into a chain by 2-part co-occurrence
        let level_sides: HashSet<&Side> = sides.iter().collect();
        let mut adj: Vec<Vec<u32>> = vec![Vec::new(); m];
        for i in 0..m {
            for j in (i + 1)..m {
                let pair: Side = parts[i].union(&parts[j]).copied().collect();
                if level_sides.contains(&pair) {
                    adj[i].push(j as u32);
                    adj[j].push(i as u32);
                }
            }
        }
        let order = chain_order(&adj)
            .ok_or_else(|| MinCutError::InternalError("cycle parts do not chain".to_string()))?;
        let pos_of_part: HashMap<u32, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, &p)| (p, pos))
            .collect();

        // classify the remaining sides inside z
        let mut part_subs: Vec<Vec<Side>> = vec![Vec::new(); m];
        for i in 0..sides.len() {
            if assigned[i] || !sides[i].is_subset(&z) {
                continue;
            }
            if let Some(p) = (0..m).find(|&p| {
                sides[i].is_subset(&parts[p]) && sides[i] != parts[p]
            }) {
                part_subs[p].push(sides[i].clone());
                assigned[i] = true;
            } else if contiguous_run(&sides[i], &parts, &part_of_atom, &pos_of_part) {
                assigned[i] = true;
            } else {
                return Err(MinCutError::InternalError(format!(
                    "cut side {:?} straddles cycle parts",
                    sides[i]
                )));
            }
        }

        // build parts and close the cycle through the root
        let mut prev = root;
        for &p in &order {
            let subs = std::mem::take(&mut part_subs[p as usize]);
            let r = self.build(&parts[p as usize], subs)?;
            self.edges.push((prev, r, half));
            prev = r;
        }
        self.edges.push((prev, root, half));
        Ok(z)
    }
}

fn crosses(a: &Side, b: &Side) -> bool {
    !a.is_disjoint(b) && !a.is_subset(b) && !b.is_subset(a)
}

/// Side must be a union of whole parts occupying consecutive chain positions
fn contiguous_run(
    side: &Side,
    parts: &[Side],
    part_of_atom: &HashMap<u32, u32>,
    pos_of_part: &HashMap<u32, usize>,
) -> bool {
    let mut positions = BTreeSet::new();
    let mut covered = 0usize;
    for a in side {
        let Some(&p) = part_of_atom.get(a) else {
            return false;
        };
        if positions.insert(pos_of_part[&p]) {
            covered += parts[p as usize].len();
        }
    }
    if covered != side.len() {
        return false;
    }
    match (positions.first(), positions.last()) {
        (Some(&lo), Some(&hi)) => hi - lo + 1 == positions.len(),
        _ => false,
    }
}

/// Walk a degree-<=2 adjacency into a covering simple path
fn chain_order(adj: &[Vec<u32>]) -> Option<Vec<u32>> {
    let m = adj.len();
    let mut ends = adj
        .iter()
        .enumerate()
        .filter(|(_, nb)| nb.len() == 1)
        .map(|(i, _)| i as u32);
    if adj.iter().any(|nb| nb.len() > 2 || nb.is_empty()) {
        return None;
    }
    let start = ends.next()?;
    let mut order = vec![start];
    let mut prev = u32::MAX;
    let mut cur = start;
    while order.len() < m {
        let next = *adj[cur as usize].iter().find(|&&x| x != prev)?;
        prev = cur;
        cur = next;
        order.push(cur);
    }
    Some(order)
}
