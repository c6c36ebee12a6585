//! TF-IDF weighting.
//!
//! For a corpus of `n` documents:
//! - `tf(t, d)` is the raw count of term `t` in document `d`
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, where `df(t)` counts documents containing `t`
//! - each document vector is scaled to unit L2 norm (all-zero vectors stay zero)
//!
//! Feature indices follow the lexicographic order of the vocabulary, so the
//! same corpus always produces the same vectors.

use crate::tokenize::tokenize;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Sparse document vector with entries sorted by feature index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// L2 norm
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product via a merge over the sorted entries
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fits a vocabulary and IDF weights to a corpus and produces its TF-IDF vectors
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    remove_stop_words: bool,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// English stop words are removed by default
    pub fn new() -> Self {
        Self {
            remove_stop_words: true,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn with_stop_words(mut self, remove: bool) -> Self {
        self.remove_stop_words = remove;
        self
    }

    /// Term -> feature index, after fitting
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// IDF weight per feature index, after fitting
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Learn the vocabulary and IDF weights from `documents`, then return
    /// one normalized vector per document, in input order.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        let remove_stop_words = self.remove_stop_words;

        // Term counts per document, keyed by term text
        let counts: Vec<BTreeMap<String, u32>> = documents
            .par_iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for token in tokenize(doc.as_ref(), remove_stop_words) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let terms: BTreeSet<&str> = counts
            .iter()
            .flat_map(|c| c.keys().map(String::as_str))
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut df = vec![0usize; self.vocabulary.len()];
        for doc_counts in &counts {
            for term in doc_counts.keys() {
                if let Some(&idx) = self.vocabulary.get(term) {
                    df[idx] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        self.idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        debug!(
            "Fitted vocabulary of {} terms over {} documents",
            self.vocabulary.len(),
            documents.len()
        );

        let vocabulary = &self.vocabulary;
        let idf = &self.idf;
        counts
            .into_par_iter()
            .map(|doc_counts| {
                // BTreeMap iteration is lexicographic, matching feature order
                let mut entries: Vec<(usize, f64)> = doc_counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        vocabulary
                            .get(term)
                            .map(|&idx| (idx, count as f64 * idf[idx]))
                    })
                    .collect();
                normalize(&mut entries);
                SparseVector { entries }
            })
            .collect()
    }
}

fn normalize(entries: &mut [(usize, f64)]) {
    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in entries.iter_mut() {
            *w /= norm;
        }
    }
}
