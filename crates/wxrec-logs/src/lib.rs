//! Monthly interval log access
//!
//! The acquisition subsystem writes one comma-separated log file per
//! calendar month. This crate knows where those files live and how to turn
//! one line into an [`IntervalRecord`](wxrec_core::IntervalRecord). It does
//! not decide what a bad line means for a scan; callers log and move on.

pub mod locator;
pub mod parser;

pub use locator::*;
pub use parser::*;

use std::path::PathBuf;
use thiserror::Error;

/// Why a single log line was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid date: {0:?}")]
    BadDate(String),

    #[error("invalid time: {0:?}")]
    BadTime(String),

    #[error("invalid number in column {column}: {value:?}")]
    BadNumber { column: usize, value: String },
}

/// A rejected line, with enough context to find it again
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}:{}: {}", .path.display(), .line, .kind)]
pub struct LogParseError {
    pub path: PathBuf,
    pub line: usize,
    pub kind: ParseErrorKind,
}

pub type ParseResult<T> = Result<T, LogParseError>;
