//! Static building blocks consumed by the dynamic core
//!
//! - [`traits`]: the seams (`CactusEngine`, `DecrementalRebuild`)
//! - [`allcuts`]: default all-minimum-cuts engine
//! - [`flow`]: Dinic max-flow / min s-t cut, bounded and unbounded
//! - [`noi`]: MA-ordering global minimum cut value
//! - [`rebuild`]: default engine-backed decremental rebuilder

pub mod allcuts;
pub mod flow;
pub mod noi;
pub mod rebuild;
pub mod traits;

pub use allcuts::EnumerativeCactus;
pub use flow::{solve_max_flow_min_cut, FlowNetwork};
pub use rebuild::EngineRebuild;
pub use traits::{CactusEngine, CactusResult, DecrementalRebuild};
