//! Cactus-specific operations on [`crate::graph::MutableGraph`]
//!
//! The cactus is stored as an ordinary [`crate::graph::MutableGraph`]; this
//! module adds the two operations the dynamic core needs on top of it:
//! the contraction-region finder ([`path`]) and the region contraction with
//! its sparse-hub fast path ([`contract`]).

pub mod contract;
pub mod path;

pub use contract::contract_region;
pub use path::contraction_region;
