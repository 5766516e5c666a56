//! Series provider trait and structured error types.
//!
//! The SeriesProvider trait abstracts over where dated series come from
//! (CSV file, Parquet file, synthetic generator) so the pipeline and its
//! tests never depend on a concrete source.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DatedValue;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("unparseable date '{value}' at row {row} of {source_name} (expected format {format})")]
    BadDate {
        source_name: String,
        row: usize,
        value: String,
        format: String,
    },

    #[error("unparseable value '{value}' at row {row} of {source_name}")]
    BadValue {
        source_name: String,
        row: usize,
        value: String,
    },

    #[error("{source_name} contains no rows")]
    Empty { source_name: String },

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    CsvImport,
    ParquetImport,
    Synthetic,
}

/// A source of one dated value series.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider (used in errors and logs).
    fn name(&self) -> &str;

    /// Provenance tag recorded in run results.
    fn source(&self) -> DataSource;

    /// Load the full series. Order is not required; alignment sorts.
    fn load(&self) -> Result<Vec<DatedValue>, DataError>;
}
