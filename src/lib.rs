//! # Cactus MinCut
//!
//! Dynamic minimum cut maintenance for undirected weighted graphs.
//!
//! The crate maintains, across edge insertions and deletions, both the
//! global minimum cut value λ and a cactus graph representing *all*
//! minimum cuts of the current graph. Most updates are absorbed by cheap
//! incremental transformations of the cactus; when a rebuild is
//! unavoidable, a single-slot cache can often replay its way out of a
//! fresh all-mincuts computation.
//!
//! ## Quick Start
//!
//! ```rust
//! use cactus_mincut::{DynamicMinCut, MinCutConfig, MutableGraph};
//!
//! // a 4-cycle with unit weights
//! let graph = MutableGraph::from_edges(
//!     4,
//!     &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)],
//! ).unwrap();
//!
//! let mut mincut = DynamicMinCut::new(MinCutConfig::default());
//! assert_eq!(mincut.initialize(graph).unwrap(), 2);
//!
//! // inserting a chord cannot lower the cut
//! assert_eq!(mincut.add_edge(0, 2, 1).unwrap(), 2);
//!
//! // deleting a cycle edge does
//! assert_eq!(mincut.remove_edge(2, 3).unwrap(), 1);
//! ```
//!
//! ## Architecture
//!
//! - [`graph`]: the mutable graph store shared by G and the cactus
//! - [`cactus`]: contraction regions and region contraction
//! - [`algo`]: static engines (all-mincuts, max-flow, NOI) and their seams
//! - [`dynamic`]: the dynamic core and its snapshot cache
//!
//! The static engines are consumed through the [`algo::CactusEngine`] and
//! [`algo::DecrementalRebuild`] traits; swapping in a parallel engine never
//! touches the core.
//!
//! ## Concurrency
//!
//! An instance is single-threaded: every public call runs to completion on
//! the calling thread, and distinct instances share nothing. Callers that
//! want concurrent access must serialize externally.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod algo;
pub mod cactus;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod graph;

pub use algo::{
    CactusEngine, CactusResult, DecrementalRebuild, EngineRebuild, EnumerativeCactus,
};
pub use config::{MinCutConfig, MAX_CACHE};
pub use dynamic::{DynamicMinCut, DynamicStats};
pub use error::{MinCutError, Result};
pub use graph::{EdgeIndex, EdgeWeight, GraphStats, HalfEdge, MutableGraph, VertexId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude with the commonly used types
///
/// ```rust
/// use cactus_mincut::prelude::*;
///
/// let mut mincut = DynamicMinCut::new(MinCutConfig::default());
/// let graph = MutableGraph::from_edges(2, &[(0, 1, 3)]).unwrap();
/// assert_eq!(mincut.initialize(graph).unwrap(), 3);
/// ```
pub mod prelude {
    //! Commonly used types

    pub use crate::{
        CactusEngine, CactusResult, DecrementalRebuild, DynamicMinCut, DynamicStats,
        EdgeWeight, EngineRebuild, EnumerativeCactus, GraphStats, MinCutConfig, MinCutError,
        MutableGraph, Result, VertexId, MAX_CACHE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "cactus-mincut");
    }

    #[test]
    fn test_basic_workflow() {
        let graph = MutableGraph::from_edges(
            4,
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)],
        )
        .unwrap();
        let mut mincut = DynamicMinCut::new(MinCutConfig::default());
        assert_eq!(mincut.initialize(graph).unwrap(), 2);

        assert_eq!(mincut.add_edge(0, 2, 2).unwrap(), 2);
        // vertex 1 keeps only its unit edge to 2 after this
        assert_eq!(mincut.remove_edge(0, 1).unwrap(), 1);
        assert_eq!(mincut.remove_edge(2, 3).unwrap(), 1);

        let stats = mincut.stats();
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.deletions, 2);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let mut mincut = DynamicMinCut::new(MinCutConfig::default());
        let graph = MutableGraph::from_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
        assert_eq!(mincut.initialize(graph).unwrap(), 2);
    }

    #[test]
    fn test_accessors_track_state() {
        let graph = MutableGraph::from_edges(2, &[(0, 1, 4)]).unwrap();
        let mut mincut = DynamicMinCut::new(MinCutConfig::default());
        mincut.initialize(graph).unwrap();
        assert_eq!(mincut.current_cut(), 4);
        assert_eq!(mincut.original_graph().unwrap().num_edges(), 1);
        assert_eq!(mincut.current_cactus().unwrap().num_vertices(), 2);
    }
}
