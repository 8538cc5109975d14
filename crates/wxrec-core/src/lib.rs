//! Core data types, units, and record sets for the weather records engine
//!
//! This crate holds the vocabulary shared by the log parser, the day
//! summary store and the aggregators: observations, record values,
//! scopes, unit-aware settings and the day summary store seam.

pub mod records;
pub mod scope;
pub mod store;
pub mod types;
pub mod units;

pub use records::*;
pub use scope::*;
pub use store::*;
pub use types::*;
pub use units::*;
