//! # Engine Crate
//!
//! Builds or loads the similarity model and answers "movies like this one".
//!
//! ## Main Components
//!
//! - **config**: `ModelConfig` (dataset path, cache directory, staleness threshold)
//! - **model**: `Model`, `ModelBuilder` and the process-wide `shared_model`
//! - **recommender**: `recommend` / `recommend_scored`
//! - **error**: `EngineError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{recommend, shared_model, ModelConfig};
//!
//! let model = shared_model(&ModelConfig::default())?;
//! for title in recommend("Avatar", model.table(), model.matrix())? {
//!     println!("{title}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod recommender;

pub use config::ModelConfig;
pub use error::{EngineError, Result};
pub use model::{Model, ModelBuilder, load_or_build, shared_model};
pub use recommender::{DEFAULT_RECOMMENDATIONS, Recommendation, recommend, recommend_scored};
