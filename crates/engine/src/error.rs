//! Error types for the recommendation engine.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors surfaced by model building and recommendation
#[derive(Error, Debug)]
pub enum EngineError {
    /// Dataset or artifact failure from the data layer
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// The queried title is not in the movie table
    #[error("Unknown title: {title:?}")]
    UnknownTitle { title: String },

    /// Table and matrix are not row-aligned
    #[error("Model shape mismatch: {records} records but matrix is {rows}x{cols}")]
    ShapeMismatch {
        records: usize,
        rows: usize,
        cols: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
