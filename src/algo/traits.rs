//! Collaborator seams for the dynamic core
//!
//! The dynamic core consumes its static building blocks through these
//! traits. The default implementations live in this module's siblings; a
//! parallel cactus engine or a genuinely decremental rebuilder can be
//! plugged in without touching the core.

use crate::error::Result;
use crate::graph::{EdgeWeight, MutableGraph, VertexId};

/// Output of an all-minimum-cuts computation
#[derive(Debug)]
pub struct CactusResult {
    /// The global minimum cut value
    pub cut: EdgeWeight,
    /// Cactus representing every minimum cut
    pub cactus: MutableGraph,
    /// Whether some minimum cut splits the vertices within a 1/3 - 2/3 band
    pub balanced: bool,
}

/// Static engine producing the cactus of all minimum cuts
pub trait CactusEngine: Send + Sync {
    /// Compute (λ, cactus, balanced) for `g`.
    ///
    /// A `hint`, when given, is a freshly computed exact λ the engine may
    /// trust instead of recomputing it.
    fn find_all_mincuts(
        &self,
        g: &MutableGraph,
        hint: Option<EdgeWeight>,
    ) -> Result<CactusResult>;
}

/// Cactus reconstruction after an edge deletion lowered the cut
pub trait DecrementalRebuild: Send + Sync {
    /// Rebuild the cactus for `g` given that `s` lies on one side of the
    /// new minimum cut of value `new_cut`. `fpid` scopes transient solver
    /// state for this call.
    fn rebuild(
        &self,
        g: &MutableGraph,
        s: VertexId,
        new_cut: EdgeWeight,
        fpid: u64,
    ) -> Result<MutableGraph>;
}
