//! Dynamic minimum cut maintenance
//!
//! [`DynamicMinCut`] owns the live graph G and the cactus C of all minimum
//! cuts, and keeps both current across edge insertions and deletions:
//!
//! - an insert whose endpoints share a cactus super-vertex changes nothing;
//! - an insert crossing the cactus contracts the region of super-vertices
//!   no surviving minimum cut separates, or triggers a full recompute when
//!   that region is the whole cactus;
//! - a delete runs a bounded flow (did the cut survive?) or an unbounded
//!   flow (what is the new cut?) and rebuilds the cactus when λ dropped.
//!
//! A single-slot cache remembers the displaced cactus across a rebuild and
//! replays logged inserts on it when a later recompute finds the cut value
//! unchanged, which is much cheaper than a fresh all-mincuts run.

pub mod cache;

use std::collections::HashSet;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::algo::flow::solve_max_flow_min_cut;
use crate::algo::noi;
use crate::algo::traits::{CactusEngine, DecrementalRebuild};
use crate::algo::{EngineRebuild, EnumerativeCactus};
use crate::cactus;
use crate::config::MinCutConfig;
use crate::dynamic::cache::CutCache;
use crate::error::{MinCutError, Result};
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// Counters over the lifetime of a dynamic instance
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicStats {
    /// Edge insertions processed
    pub insertions: u64,
    /// Edge deletions processed
    pub deletions: u64,
    /// Cactus contractions performed
    pub contractions: u64,
    /// Full all-mincuts recomputations
    pub full_rebuilds: u64,
    /// Recomputations answered from the cache
    pub cache_replays: u64,
}

/// Dynamic minimum cut instance
pub struct DynamicMinCut {
    config: MinCutConfig,
    graph: Option<MutableGraph>,
    cactus: Option<MutableGraph>,
    cut: EdgeWeight,
    flow_problem_id: u64,
    cache: CutCache,
    stats: DynamicStats,
    engine: Box<dyn CactusEngine>,
    rebuilder: Box<dyn DecrementalRebuild>,
}

impl DynamicMinCut {
    /// Create an instance with the default engine and rebuilder
    pub fn new(config: MinCutConfig) -> Self {
        Self::with_engine(
            config,
            Box::new(EnumerativeCactus),
            Box::new(EngineRebuild::new()),
        )
    }

    /// Create an instance with explicit collaborators
    pub fn with_engine(
        config: MinCutConfig,
        engine: Box<dyn CactusEngine>,
        rebuilder: Box<dyn DecrementalRebuild>,
    ) -> Self {
        Self {
            config,
            graph: None,
            cactus: None,
            cut: 0,
            flow_problem_id: 0,
            cache: CutCache::new(),
            stats: DynamicStats::default(),
            engine,
            rebuilder,
        }
    }

    /// Take ownership of the graph, build the initial cactus and return λ.
    ///
    /// Must be called exactly once before any update.
    pub fn initialize(&mut self, graph: MutableGraph) -> Result<EdgeWeight> {
        if self.graph.is_some() {
            return Err(MinCutError::AlreadyInitialized);
        }
        let start = Instant::now();
        let result = self.engine.find_all_mincuts(&graph, None)?;
        self.cut = result.cut;
        self.cactus = Some(result.cactus);
        self.graph = Some(graph);
        self.flow_problem_id = StdRng::seed_from_u64(self.config.seed).gen::<u32>() as u64;
        if self.config.verbose {
            debug!(
                elapsed_us = start.elapsed().as_micros() as u64,
                cut = self.cut,
                cactus_vertices = self.cactus.as_ref().map_or(0, MutableGraph::num_vertices),
                "initialize"
            );
        }
        Ok(self.cut)
    }

    /// Insert the edge (s, t, w) and return the updated λ
    pub fn add_edge(&mut self, s: VertexId, t: VertexId, w: EdgeWeight) -> Result<EdgeWeight> {
        let start = Instant::now();
        if s == t {
            return Err(MinCutError::SelfLoop(s));
        }
        self.check_original(s)?;
        self.check_original(t)?;

        // cactus positions before the graph changes
        let u = self.require_cactus()?.position(s);
        let v = self.require_cactus()?.position(t);
        self.require_graph_mut()?.new_edge_order(s, t, w)?;
        self.cache.record(s, t, w);
        self.stats.insertions += 1;

        if u != v {
            if self.cut == 0 {
                if self.require_cactus()?.num_vertices() == 2 {
                    if self.config.verbose {
                        debug!("full recompute from empty");
                    }
                    self.full_recompute(None)?;
                } else {
                    if self.config.verbose {
                        debug!("contract two empty vertices");
                    }
                    let pair: HashSet<VertexId> = [u, v].into_iter().collect();
                    self.require_cactus_mut()?.contract_vertex_set(&pair)?;
                    self.stats.contractions += 1;
                }
            } else {
                let region =
                    cactus::contraction_region(self.require_cactus()?, u, v, self.cut)?;
                if region.len() == self.require_cactus()?.num_vertices() {
                    if self.config.verbose {
                        debug!("full recompute");
                    }
                    // the tentative cut exists only while caching: without a
                    // snapshot there is nothing to compare it against
                    let tentative = if self.cache.is_active() {
                        Some(noi::minimum_cut(self.require_graph()?))
                    } else {
                        None
                    };
                    if tentative == Some(self.cache.cut())
                        && 2 * self.cache.log_len() < self.cache.cactus_vertices()
                    {
                        self.build_cactus_from_cache()?;
                    } else {
                        self.full_recompute(tentative)?;
                    }
                } else {
                    if self.config.verbose {
                        debug!(region = region.len(), "contract region");
                    }
                    cactus::contract_region(self.require_cactus_mut()?, &region)?;
                    self.stats.contractions += 1;
                }
            }
        }

        if self.config.verbose {
            debug!(
                elapsed_us = start.elapsed().as_micros() as u64,
                cut = self.cut,
                cactus_vertices = self.require_cactus()?.num_vertices(),
                "add_edge"
            );
        }
        Ok(self.cut)
    }

    /// Delete the edge (s, t) and return the updated λ.
    ///
    /// Deleting an edge that does not exist logs a warning and changes
    /// nothing.
    pub fn remove_edge(&mut self, s: VertexId, t: VertexId) -> Result<EdgeWeight> {
        let start = Instant::now();
        self.check_original(s)?;
        self.check_original(t)?;

        let Some(slot) = self.require_graph()?.edge_slot(s, t) else {
            warn!(s, t, "deleting edge that does not exist, doing nothing");
            return Ok(self.cut);
        };
        let w = self.require_graph()?.edge_weight(s, slot);
        self.require_graph_mut()?.delete_edge(s, slot)?;
        self.stats.deletions += 1;
        let u = self.require_cactus()?.position(s);
        let v = self.require_cactus()?.position(t);

        if w == 0 {
            if self.config.verbose {
                debug!("edge has zero weight, current cut remains the same");
            }
            return Ok(self.cut);
        }
        if self.cut == 0 {
            if self.config.verbose {
                debug!("graph already split into components, cut remains 0");
            }
            return Ok(self.cut);
        }

        if u != v {
            // the deleted edge crossed a minimum cut; every s-t cut just
            // lost w, so the unbounded flow is the new λ
            if self.config.verbose {
                debug!("deleted edge crossed a minimum cut, recompute");
            }
            let displaced = self.take_cactus()?;
            self.cache.snapshot(displaced, self.cut);
            let fpid = self.next_flow_problem();
            let (flow, _) =
                solve_max_flow_min_cut(self.require_graph()?, &[s, t], 0, None, fpid)?;
            let rebuilt = self
                .rebuilder
                .rebuild(self.require_graph()?, s, flow, fpid)?;
            self.cut = flow;
            self.cactus = Some(rebuilt);
        } else {
            let fpid = self.next_flow_problem();
            let (flow, _) = solve_max_flow_min_cut(
                self.require_graph()?,
                &[s, t],
                0,
                Some(self.cut),
                fpid,
            )?;
            if flow >= self.cut {
                if self.config.verbose {
                    debug!("cut not changed");
                }
            } else {
                let displaced = self.take_cactus()?;
                self.cache.snapshot(displaced, self.cut);
                let rebuilt = self
                    .rebuilder
                    .rebuild(self.require_graph()?, s, flow, fpid)?;
                self.cut = flow;
                self.cactus = Some(rebuilt);
                if self.config.verbose {
                    debug!(flow, "recomputing, minimum cut changed");
                }
            }
        }

        if self.config.verbose {
            debug!(
                elapsed_us = start.elapsed().as_micros() as u64,
                cut = self.cut,
                "remove_edge"
            );
        }
        Ok(self.cut)
    }

    /// Current minimum cut value
    pub fn current_cut(&self) -> EdgeWeight {
        self.cut
    }

    /// Current cactus, if initialized
    pub fn current_cactus(&self) -> Option<&MutableGraph> {
        self.cactus.as_ref()
    }

    /// Current live graph, if initialized
    pub fn original_graph(&self) -> Option<&MutableGraph> {
        self.graph.as_ref()
    }

    /// Lifetime counters
    pub fn stats(&self) -> DynamicStats {
        self.stats
    }

    /// Whether the insert cache currently holds a snapshot
    pub fn is_caching(&self) -> bool {
        self.cache.is_active()
    }

    /// Number of inserts logged against the cached snapshot
    pub fn cache_log_len(&self) -> usize {
        self.cache.log_len()
    }

    // ===== internals =====

    /// Replay the logged inserts on the cached cactus and install it.
    ///
    /// Precondition: a fresh NOI run confirmed the current cut equals the
    /// cached one. Falls back to a full recompute if a replayed insert
    /// would collapse the whole cached cactus.
    fn build_cactus_from_cache(&mut self) -> Result<()> {
        let Some((mut cached, cached_cut, log)) = self.cache.take() else {
            return Err(MinCutError::InternalError(
                "cache replay without a snapshot".to_string(),
            ));
        };
        for (s, t, _) in log {
            let u = cached.position(s);
            let v = cached.position(t);
            if u == v {
                continue;
            }
            let region = cactus::contraction_region(&cached, u, v, self.cut)?;
            if region.len() == cached.num_vertices() {
                if self.config.verbose {
                    debug!("cache replay collapsed, full recompute");
                }
                return self.full_recompute(None);
            }
            cactus::contract_region(&mut cached, &region)?;
        }
        self.stats.cache_replays += 1;
        self.cactus = Some(cached);
        self.cut = cached_cut;
        Ok(())
    }

    fn full_recompute(&mut self, hint: Option<EdgeWeight>) -> Result<()> {
        let result = self.engine.find_all_mincuts(self.require_graph()?, hint)?;
        self.cut = result.cut;
        self.cactus = Some(result.cactus);
        self.stats.full_rebuilds += 1;
        Ok(())
    }

    fn next_flow_problem(&mut self) -> u64 {
        let id = self.flow_problem_id;
        self.flow_problem_id += 1;
        id
    }

    fn check_original(&self, v: VertexId) -> Result<()> {
        if (v as usize) >= self.require_graph()?.total_vertices() {
            return Err(MinCutError::InvalidVertex(v));
        }
        Ok(())
    }

    fn require_graph(&self) -> Result<&MutableGraph> {
        self.graph.as_ref().ok_or(MinCutError::NotInitialized)
    }

    fn require_graph_mut(&mut self) -> Result<&mut MutableGraph> {
        self.graph.as_mut().ok_or(MinCutError::NotInitialized)
    }

    fn require_cactus(&self) -> Result<&MutableGraph> {
        self.cactus.as_ref().ok_or(MinCutError::NotInitialized)
    }

    fn require_cactus_mut(&mut self) -> Result<&mut MutableGraph> {
        self.cactus.as_mut().ok_or(MinCutError::NotInitialized)
    }

    fn take_cactus(&mut self) -> Result<MutableGraph> {
        self.cactus.take().ok_or(MinCutError::NotInitialized)
    }
}
