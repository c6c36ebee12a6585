//! # Vectorizer Crate
//!
//! Turns plot synopses into a pairwise similarity matrix.
//!
//! ## Main Components
//!
//! - **tokenize**: lowercase word tokenization with stop-word removal
//! - **stop_words**: the English stop-word list
//! - **tfidf**: `TfidfVectorizer` producing L2-normalized sparse vectors
//! - **kernel**: dense linear kernel (cosine similarity) between all documents
//!
//! ## Example Usage
//!
//! ```ignore
//! let texts = vec!["A marine on Pandora", "Pirates on the high seas"];
//! let output = vectorizer::pairwise_similarity(&texts);
//! assert_eq!(output.values.len(), output.dim * output.dim);
//! ```

pub mod kernel;
pub mod stop_words;
pub mod tfidf;
pub mod tokenize;

pub use kernel::linear_kernel;
pub use tfidf::{SparseVector, TfidfVectorizer};

use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Summary of a similarity build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildStats {
    pub documents: usize,
    pub vocabulary: usize,
    pub elapsed: Duration,
}

/// Row-major `dim x dim` similarity values plus build statistics
#[derive(Debug, Clone)]
pub struct SimilarityOutput {
    pub dim: usize,
    pub values: Vec<f64>,
    pub stats: BuildStats,
}

/// Vectorize `texts` with English stop words removed and compute their
/// pairwise cosine similarities.
#[instrument(skip_all, fields(documents = texts.len()))]
pub fn pairwise_similarity<S: AsRef<str> + Sync>(texts: &[S]) -> SimilarityOutput {
    let start = Instant::now();

    let mut vectorizer = TfidfVectorizer::new();
    let vectors = vectorizer.fit_transform(texts);
    let values = linear_kernel(&vectors, vectorizer.n_features());

    let stats = BuildStats {
        documents: texts.len(),
        vocabulary: vectorizer.n_features(),
        elapsed: start.elapsed(),
    };
    info!(
        "Built similarity matrix: {} documents, {} terms in {:?}",
        stats.documents, stats.vocabulary, stats.elapsed
    );

    SimilarityOutput {
        dim: texts.len(),
        values,
        stats,
    }
}
