//! Records aggregation engine
//!
//! Scans day summaries or raw interval logs and computes record extremes
//! per scope. Every scan allocates its own window, spell tracker and
//! accumulators, so concurrent report requests never share scan state.

pub mod day_file;
pub mod fold;
pub mod log_file;
pub mod spell;
pub mod store;
pub mod window;

pub use fold::{DaySource, MonthFlush, ScopeFolder};
pub use spell::*;
pub use store::*;
pub use window::*;

use std::path::PathBuf;
use thiserror::Error;
use wxrec_core::Scope;

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("No data available for scope {0}")]
    NoData(Scope),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown record metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown scope in snapshot: {0}")]
    UnknownScope(String),

    #[error("Day summary store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RecordsResult<T> = Result<T, RecordsError>;
