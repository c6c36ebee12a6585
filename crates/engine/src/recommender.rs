//! Plot-similarity recommendations.
//!
//! Given a title, rank every other movie by its similarity score in the
//! query's matrix row. Ties keep table order.

use crate::error::{EngineError, Result};
use data_loader::{MovieId, MovieTable, SimilarityMatrix};
use serde::Serialize;
use tracing::{debug, instrument};

/// Number of titles returned by `recommend`
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// A recommended movie with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
}

/// Titles of the five movies most similar to `title`, most similar first.
///
/// The query movie itself is never included. Fails with `UnknownTitle` if
/// no record carries `title` exactly.
pub fn recommend(
    title: &str,
    table: &MovieTable,
    matrix: &SimilarityMatrix,
) -> Result<Vec<String>> {
    Ok(recommend_scored(title, table, matrix, DEFAULT_RECOMMENDATIONS)?
        .into_iter()
        .map(|r| r.title)
        .collect())
}

/// Up to `limit` recommendations for `title`, with scores
#[instrument(skip(table, matrix))]
pub fn recommend_scored(
    title: &str,
    table: &MovieTable,
    matrix: &SimilarityMatrix,
    limit: usize,
) -> Result<Vec<Recommendation>> {
    let query = table
        .index_of_title(title)
        .ok_or_else(|| EngineError::UnknownTitle {
            title: title.to_string(),
        })?;

    let row = matrix.row(query).ok_or(EngineError::ShapeMismatch {
        records: table.len(),
        rows: matrix.rows(),
        cols: matrix.cols(),
    })?;

    let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
    // Stable: equal scores keep row order
    ranked.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));

    let recommendations: Vec<Recommendation> = ranked
        .into_iter()
        .filter(|&(idx, _)| idx != query)
        .filter_map(|(idx, score)| {
            table.get(idx).map(|record| Recommendation {
                movie_id: record.id,
                title: record.title.clone(),
                score,
            })
        })
        .take(limit)
        .collect();

    debug!(
        "{} recommendations for row {} of {}",
        recommendations.len(),
        query,
        table.len()
    );
    Ok(recommendations)
}

/// Sort key for a score; NaN ranks below every real score
fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
