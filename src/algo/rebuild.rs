//! Default decremental rebuilder
//!
//! A full recompute is always a correct implementation of the decremental
//! contract; the locality hints (`s`, `fpid`) exist so a smarter rebuilder
//! can exploit where the cut changed. This default forwards the new cut
//! value as the engine hint and logs the hints it ignores.

use tracing::trace;

use crate::algo::traits::{CactusEngine, DecrementalRebuild};
use crate::algo::EnumerativeCactus;
use crate::error::{MinCutError, Result};
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// Engine-backed rebuilder
pub struct EngineRebuild {
    engine: EnumerativeCactus,
}

impl EngineRebuild {
    /// Create a rebuilder backed by the default engine
    pub fn new() -> Self {
        Self {
            engine: EnumerativeCactus,
        }
    }
}

impl Default for EngineRebuild {
    fn default() -> Self {
        Self::new()
    }
}

impl DecrementalRebuild for EngineRebuild {
    fn rebuild(
        &self,
        g: &MutableGraph,
        s: VertexId,
        new_cut: EdgeWeight,
        fpid: u64,
    ) -> Result<MutableGraph> {
        trace!(s, new_cut, fpid, "decremental rebuild");
        let result = self.engine.find_all_mincuts(g, Some(new_cut))?;
        if result.cut != new_cut {
            return Err(MinCutError::InternalError(format!(
                "rebuild disagrees on cut value: {} vs {}",
                result.cut, new_cut
            )));
        }
        Ok(result.cactus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    #[test]
    fn test_rebuild_matches_new_cut() {
        let g = MutableGraph::from_edges(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]).unwrap();
        let cactus = EngineRebuild::new().rebuild(&g, 1, 1, 42).unwrap();
        assert_eq!(cactus.num_vertices(), 4);
    }

    #[test]
    fn test_rebuild_disconnected() {
        let g = MutableGraph::from_edges(4, &[(0, 1, 1), (2, 3, 1)]).unwrap();
        let cactus = EngineRebuild::new().rebuild(&g, 0, 0, 43).unwrap();
        assert_eq!(cactus.num_vertices(), 2);
    }
}
