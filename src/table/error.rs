//! Table construction and loading errors.
//!
//! These are configuration-time failures. Per-request "no route" outcomes
//! never produce an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// Parallel range columns have different lengths.
    #[error("range columns differ in length: {starts} starts, {ends} ends, {subnets} subnets")]
    LengthMismatch {
        starts: usize,
        ends: usize,
        subnets: usize,
    },

    /// Range starts are not strictly ascending.
    #[error("range start at index {index} ({key}) is not greater than the previous start")]
    Unsorted { index: usize, key: String },

    /// A range ends before it starts.
    #[error("range at index {index} ends ({end}) before it starts ({start})")]
    InvertedRange {
        index: usize,
        start: String,
        end: String,
    },

    /// A range reaches into the next one.
    #[error("range at index {index} ends at {end}, overlapping the next start {next_start}")]
    Overlap {
        index: usize,
        end: String,
        next_start: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type TableResult<T> = Result<T, TableError>;
