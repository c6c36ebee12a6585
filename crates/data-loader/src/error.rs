//! Error types for the data-loader crate.
//!
//! Two families live here:
//! - `DataLoadError` for the raw dataset and cache writes (fatal to the caller)
//! - `CacheRejection` for cache reads, which the model builder recovers from

use thiserror::Error;

/// Errors that can occur while reading the raw dataset or writing artifacts
///
/// `MissingDataset` and `MalformedDataset` are the two fatal conditions a
/// session can hit during startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Raw dataset file is absent (and the caller has no usable cache)
    #[error("Missing dataset file: {path}")]
    MissingDataset { path: String },

    /// Dataset is present but lacks a required column
    #[error("Malformed dataset {path}: {reason}")]
    MalformedDataset { path: String, reason: String },

    /// Matrix buffer length does not match its declared dimension
    #[error("Similarity matrix of dimension {dim} needs {expected} values, found {found}")]
    MatrixShape {
        dim: usize,
        expected: usize,
        found: usize,
    },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader failed below the record level
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Artifact could not be encoded
    #[error("Failed to encode artifact {path}: {reason}")]
    EncodeError { path: String, reason: String },
}

/// Why a cached artifact pair was not used.
///
/// Every variant is recoverable: the model builder logs it and rebuilds
/// from the raw dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheRejection {
    /// A cache file exists but could not be read
    #[error("failed to read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// A cache file could not be decoded into its artifact
    #[error("failed to decode {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Table and matrix disagree on their dimensions
    #[error("table has {records} records but matrix is {rows}x{cols}")]
    ShapeMismatch {
        records: usize,
        rows: usize,
        cols: usize,
    },

    /// Structurally valid but judged unreliable by the record-count heuristic
    #[error("cache holds only {records} records (threshold {threshold}) and a raw dataset is available")]
    Stale { records: usize, threshold: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
