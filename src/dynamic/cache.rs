//! Single-slot cactus cache
//!
//! A snapshot of (cactus, λ) taken at the last moment before the cactus is
//! replaced, plus a bounded log of the inserts applied to the graph since.
//! If a later full recompute finds the cut value unchanged, replaying the
//! logged inserts on the snapshot reconstructs the current cactus without a
//! fresh all-mincuts run.

use crate::config::MAX_CACHE;
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// One logged insert
pub type LoggedInsert = (VertexId, VertexId, EdgeWeight);

/// Single-slot snapshot cache
#[derive(Debug, Default)]
pub struct CutCache {
    cactus: Option<MutableGraph>,
    cut: EdgeWeight,
    log: Vec<LoggedInsert>,
    active: bool,
}

impl CutCache {
    /// Empty, inactive cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cache currently holds a usable snapshot
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Cut value of the snapshot
    pub fn cut(&self) -> EdgeWeight {
        self.cut
    }

    /// Number of logged inserts
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Vertex count of the cached cactus, 0 if none
    pub fn cactus_vertices(&self) -> usize {
        self.cactus.as_ref().map_or(0, MutableGraph::num_vertices)
    }

    /// Take ownership of the displaced cactus and start logging
    pub fn snapshot(&mut self, cactus: MutableGraph, cut: EdgeWeight) {
        self.cactus = Some(cactus);
        self.cut = cut;
        self.log.clear();
        self.active = true;
    }

    /// Log one insert; a log past [`MAX_CACHE`] deactivates the cache
    pub fn record(&mut self, s: VertexId, t: VertexId, w: EdgeWeight) {
        if self.active && self.log.len() <= MAX_CACHE {
            self.log.push((s, t, w));
        } else {
            self.active = false;
        }
    }

    /// Deactivate and hand the snapshot plus its log to the caller
    pub fn take(&mut self) -> Option<(MutableGraph, EdgeWeight, Vec<LoggedInsert>)> {
        self.active = false;
        let cactus = self.cactus.take()?;
        Some((cactus, self.cut, std::mem::take(&mut self.log)))
    }

    /// Drop any snapshot and stop logging
    pub fn invalidate(&mut self) {
        self.active = false;
        self.cactus = None;
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    #[test]
    fn test_starts_inactive() {
        let cache = CutCache::new();
        assert!(!cache.is_active());
        assert_eq!(cache.log_len(), 0);
    }

    #[test]
    fn test_record_requires_active() {
        let mut cache = CutCache::new();
        cache.record(0, 1, 2);
        assert_eq!(cache.log_len(), 0);
    }

    #[test]
    fn test_snapshot_then_record() {
        let mut cache = CutCache::new();
        cache.snapshot(MutableGraph::new(3), 5);
        assert!(cache.is_active());
        assert_eq!(cache.cut(), 5);
        assert_eq!(cache.cactus_vertices(), 3);
        cache.record(0, 1, 2);
        assert_eq!(cache.log_len(), 1);
    }

    #[test]
    fn test_overflow_deactivates() {
        let mut cache = CutCache::new();
        cache.snapshot(MutableGraph::new(2), 1);
        for i in 0..(MAX_CACHE + 2) as u32 {
            cache.record(0, 1, i as u64);
        }
        assert!(!cache.is_active());
        // the log stops growing once the flag drops
        let len = cache.log_len();
        cache.record(0, 1, 9);
        assert_eq!(cache.log_len(), len);
    }

    #[test]
    fn test_take_deactivates_and_clears() {
        let mut cache = CutCache::new();
        cache.snapshot(MutableGraph::new(2), 1);
        cache.record(0, 1, 3);
        let (cactus, cut, log) = cache.take().unwrap();
        assert_eq!(cactus.num_vertices(), 2);
        assert_eq!(cut, 1);
        assert_eq!(log, vec![(0, 1, 3)]);
        assert!(!cache.is_active());
        assert!(cache.take().is_none());
    }

    #[test]
    fn test_new_snapshot_resets_log() {
        let mut cache = CutCache::new();
        cache.snapshot(MutableGraph::new(2), 1);
        cache.record(0, 1, 3);
        cache.snapshot(MutableGraph::new(4), 2);
        assert_eq!(cache.log_len(), 0);
        assert_eq!(cache.cut(), 2);
    }
}
