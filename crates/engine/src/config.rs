//! Model configuration.

use std::path::{Path, PathBuf};

/// Default raw dataset location
pub const DEFAULT_DATASET_PATH: &str = "tmdb_5000_movies.csv";

/// Default directory for the cached artifact pair
pub const DEFAULT_MODEL_DIR: &str = "model";

/// A cached table with fewer records than this is rebuilt when the raw
/// dataset is available
pub const DEFAULT_STALE_RECORD_THRESHOLD: usize = 1000;

/// Where the model comes from and where it is cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub dataset_path: PathBuf,
    pub model_dir: PathBuf,
    pub stale_record_threshold: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            stale_record_threshold: DEFAULT_STALE_RECORD_THRESHOLD,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Set to 0 to disable the staleness check
    pub fn with_stale_record_threshold(mut self, threshold: usize) -> Self {
        self.stale_record_threshold = threshold;
        self
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("tmdb_5000_movies.csv"));
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert_eq!(config.stale_record_threshold, 1000);
    }

    #[test]
    fn test_builder_methods() {
        let config = ModelConfig::new()
            .with_dataset_path("data/movies.csv")
            .with_model_dir("/tmp/cache")
            .with_stale_record_threshold(0);

        assert_eq!(config.dataset_path(), Path::new("data/movies.csv"));
        assert_eq!(config.model_dir(), Path::new("/tmp/cache"));
        assert_eq!(config.stale_record_threshold, 0);
    }
}
