//! Configuration for a dynamic minimum cut instance
//!
//! The configuration is an immutable value handed to [`crate::DynamicMinCut`]
//! at construction. There is no process-wide mutable state.

use serde::{Deserialize, Serialize};

/// Ceiling on the number of inserts the cactus cache will log before it
/// invalidates itself. Replaying a longer log would rarely beat a rebuild.
pub const MAX_CACHE: usize = 100;

/// Degree above which a contraction-region vertex counts as "high degree"
/// for the sparse contraction fast path.
pub const HUB_DEGREE: usize = 100;

/// Degree above which a contraction-region vertex is no longer "low degree";
/// more than one such vertex disables the sparse fast path.
pub const NONLOW_DEGREE: usize = 10;

/// Configuration for [`crate::DynamicMinCut`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinCutConfig {
    /// Emit a per-call timing/debug log line for every public operation
    pub verbose: bool,
    /// Seed for the RNG that draws the initial flow-problem id
    pub seed: u64,
}

impl MinCutConfig {
    /// Configuration with verbose logging enabled
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
