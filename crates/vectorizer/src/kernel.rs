//! Pairwise linear kernel over sparse document vectors.
//!
//! Since the TF-IDF vectors are unit length, the dot product is the cosine
//! similarity. The result is a dense row-major `n x n` buffer.
//!
//! Rows are filled in parallel from an inverted index (term -> postings).
//! Row `i` accumulates `w(i, t) * w(j, t)` over the terms of document `i` in
//! increasing term order, so `(i, j)` and `(j, i)` sum identical products in
//! the same order and the matrix is exactly symmetric.

use crate::tfidf::SparseVector;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Postings list: documents containing a term, with their weights
type Postings = Vec<(usize, f64)>;

fn build_postings(vectors: &[SparseVector], n_features: usize) -> Vec<Postings> {
    let mut postings: Vec<Postings> = vec![Vec::new(); n_features];
    for (doc, vector) in vectors.iter().enumerate() {
        for &(term, weight) in &vector.entries {
            if let Some(list) = postings.get_mut(term) {
                list.push((doc, weight));
            }
        }
    }
    postings
}

/// Dense `n x n` matrix of pairwise dot products, row-major
#[instrument(skip_all, fields(documents = vectors.len(), features = n_features))]
pub fn linear_kernel(vectors: &[SparseVector], n_features: usize) -> Vec<f64> {
    let n = vectors.len();
    let mut values = vec![0.0f64; n * n];
    if n == 0 {
        return values;
    }

    let postings = build_postings(vectors, n_features);

    values
        .par_chunks_mut(n)
        .zip(vectors.par_iter())
        .for_each(|(row, vector)| {
            for &(term, weight) in &vector.entries {
                let Some(list) = postings.get(term) else {
                    continue;
                };
                for &(doc, other) in list {
                    row[doc] += weight * other;
                }
            }
        });

    debug!("Computed {}x{} similarity matrix", n, n);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfidf::TfidfVectorizer;

    fn kernel_for(texts: &[&str]) -> (Vec<f64>, usize) {
        let mut vectorizer = TfidfVectorizer::new();
        let vectors = vectorizer.fit_transform(texts);
        (linear_kernel(&vectors, vectorizer.n_features()), texts.len())
    }

    #[test]
    fn test_identical_documents_score_one() {
        let (values, n) = kernel_for(&["space war", "space war", "cooking class"]);
        assert_eq!(n, 3);
        assert!((values[1] - 1.0).abs() < 1e-12);
        assert_eq!(values[2], 0.0);
        assert!((values[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_exactly_symmetric() {
        let texts = [
            "a marine on an alien moon",
            "pirates return for treasure on the moon",
            "an alien hunts marines",
            "treasure hunters and pirates",
            "",
        ];
        let (values, n) = kernel_for(&texts);

        for i in 0..n {
            for j in 0..n {
                assert_eq!(values[i * n + j], values[j * n + i]);
            }
        }
    }

    #[test]
    fn test_diagonal_and_range() {
        let (values, n) = kernel_for(&["heist crew vault", "vault door", ""]);
        assert!((values[0] - 1.0).abs() < 1e-12);
        assert!((values[n + 1] - 1.0).abs() < 1e-12);
        // Empty document has a zero row
        assert!(values[2 * n..].iter().all(|&v| v == 0.0));
        assert!(values.iter().all(|&v| (0.0..=1.0 + 1e-12).contains(&v)));
    }

    #[test]
    fn test_empty_input() {
        assert!(linear_kernel(&[], 0).is_empty());
    }

    #[test]
    fn test_matches_pairwise_dot() {
        let mut vectorizer = TfidfVectorizer::new();
        let vectors = vectorizer.fit_transform(&["red fox jumps", "lazy red dog", "fox and dog"]);
        let values = linear_kernel(&vectors, vectorizer.n_features());

        for i in 0..3 {
            for j in 0..3 {
                assert!((values[i * 3 + j] - vectors[i].dot(&vectors[j])).abs() < 1e-12);
            }
        }
    }
}
