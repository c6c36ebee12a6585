//! # Data Loader Crate
//!
//! This crate handles the movie dataset and the artifacts derived from it.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieDocument, MovieTable, SimilarityMatrix)
//! - **parser**: Parse the raw CSV dataset into `MovieDocument`s
//! - **cache**: Persist and reload the `(MovieTable, SimilarityMatrix)` pair
//! - **error**: Error types for data loading and cache validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, cache::{self, ArtifactPaths, CacheOutcome}};
//! use std::path::Path;
//!
//! let movies = parser::parse_movies(Path::new("tmdb_5000_movies.csv"))?;
//! println!("Parsed {} movies", movies.len());
//!
//! match cache::load_artifacts(&ArtifactPaths::in_dir(Path::new("model"))) {
//!     CacheOutcome::Hit { table, .. } => println!("{} cached titles", table.len()),
//!     CacheOutcome::Absent => println!("no cache yet"),
//!     CacheOutcome::Rejected(why) => println!("cache unusable: {why}"),
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod cache;

// Re-export commonly used types for convenience
pub use error::{CacheRejection, DataLoadError, Result};
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    MovieDocument,
    MovieRecord,
    MovieTable,
    SimilarityMatrix,
};
pub use cache::{ArtifactPaths, CacheOutcome};
