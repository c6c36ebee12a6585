//! Building and loading the recommendation model.
//!
//! A `Model` is the row-aligned pair of `MovieTable` and `SimilarityMatrix`.
//! It comes from the on-disk cache when that is usable, otherwise from the
//! raw dataset, in which case the cache is rewritten.

use crate::config::ModelConfig;
use crate::error::{EngineError, Result};
use data_loader::cache::{self, ArtifactPaths, CacheOutcome};
use data_loader::{CacheRejection, MovieDocument, MovieTable, SimilarityMatrix, parser};
use std::sync::OnceLock;
use tracing::{debug, info, instrument, warn};
use vectorizer::BuildStats;

/// Row-aligned movie table and similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    table: MovieTable,
    matrix: SimilarityMatrix,
}

impl Model {
    /// Pair a table with its matrix, checking `table.len() == rows == cols`
    pub fn new(table: MovieTable, matrix: SimilarityMatrix) -> Result<Self> {
        if table.len() != matrix.rows() || table.len() != matrix.cols() {
            return Err(EngineError::ShapeMismatch {
                records: table.len(),
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
        Ok(Self { table, matrix })
    }

    pub fn table(&self) -> &MovieTable {
        &self.table
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Vectorize the synopses of `documents` and pair them with their table
    pub fn from_documents(documents: &[MovieDocument]) -> Result<(Self, BuildStats)> {
        let overviews: Vec<&str> = documents.iter().map(|d| d.overview.as_str()).collect();
        let output = vectorizer::pairwise_similarity(&overviews);

        let table = MovieTable::new(documents.iter().map(MovieDocument::to_record).collect());
        let matrix = SimilarityMatrix::new(output.dim, output.values)?;
        Ok((Self::new(table, matrix)?, output.stats))
    }
}

/// Loads the model from cache or builds it from the raw dataset
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    config: ModelConfig,
}

impl ModelBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.config.model_dir)
    }

    /// Use the cached pair if it is valid and not stale, otherwise rebuild.
    ///
    /// Cache problems are logged and recovered from. Only dataset failures
    /// during a rebuild are returned as errors.
    #[instrument(skip(self), fields(model_dir = %self.config.model_dir.display()))]
    pub fn load_or_build(&self) -> Result<Model> {
        match self.check_cache() {
            CacheOutcome::Hit { table, matrix } => {
                info!("Loaded cached model with {} movies", table.len());
                return Model::new(table, matrix);
            }
            CacheOutcome::Absent => {
                info!("No cached model, building from dataset");
            }
            CacheOutcome::Rejected(rejection) => {
                warn!("Discarding cached model: {}", rejection);
            }
        }

        self.rebuild()
    }

    /// Cache lookup plus the staleness heuristic
    fn check_cache(&self) -> CacheOutcome {
        match cache::load_artifacts(&self.artifact_paths()) {
            CacheOutcome::Hit { table, .. }
                if table.len() < self.config.stale_record_threshold
                    && self.config.dataset_path.is_file() =>
            {
                CacheOutcome::Rejected(CacheRejection::Stale {
                    records: table.len(),
                    threshold: self.config.stale_record_threshold,
                })
            }
            outcome => outcome,
        }
    }

    /// Build from the raw dataset regardless of the cache, then overwrite it
    #[instrument(skip(self), fields(dataset = %self.config.dataset_path.display()))]
    pub fn rebuild(&self) -> Result<Model> {
        let documents = parser::parse_movies(&self.config.dataset_path)?;
        debug!("Vectorizing {} synopses", documents.len());

        let (model, stats) = Model::from_documents(&documents)?;
        cache::save_artifacts(&self.artifact_paths(), &model.table, &model.matrix)?;

        info!(
            "Built model: {} movies, {} terms in {:?}",
            stats.documents, stats.vocabulary, stats.elapsed
        );
        Ok(model)
    }
}

/// Load the cached model or build it from `config`
pub fn load_or_build(config: &ModelConfig) -> Result<Model> {
    ModelBuilder::new(config.clone()).load_or_build()
}

static MODEL: OnceLock<Model> = OnceLock::new();

/// Process-wide model, built or loaded on first use.
///
/// `config` is only consulted by the call that initializes the model. A
/// failed initialization leaves the slot empty so a later call can retry.
pub fn shared_model(config: &ModelConfig) -> Result<&'static Model> {
    if let Some(model) = MODEL.get() {
        return Ok(model);
    }
    let model = load_or_build(config)?;
    Ok(MODEL.get_or_init(|| model))
}
