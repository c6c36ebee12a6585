//! Core domain types for the movie dataset and its derived artifacts.
//!
//! - `MovieDocument`: a raw dataset row projected to the fields we use
//! - `MovieRecord` / `MovieTable`: the user-facing table, row-aligned with the matrix
//! - `SimilarityMatrix`: dense `N x N` pairwise scores

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (TMDB ids)
pub type MovieId = i64;

// =============================================================================
// Dataset Rows
// =============================================================================

/// A dataset row projected to `{id, title, overview}`.
///
/// `overview` is always a string; absent or empty cells become `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
}

impl MovieDocument {
    /// Drop the synopsis, keeping what the cache persists
    pub fn to_record(&self) -> MovieRecord {
        MovieRecord {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

// =============================================================================
// Movie Table
// =============================================================================

/// A movie as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
}

/// Ordered sequence of movies.
///
/// The position of a record is its row in the `SimilarityMatrix`. Two lookup
/// maps are derived from the records on construction and never persisted:
/// - `title_index`: exact title -> first row carrying it
/// - `id_index`: movie id -> first row carrying it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<MovieRecord>", into = "Vec<MovieRecord>")]
pub struct MovieTable {
    records: Vec<MovieRecord>,
    title_index: HashMap<String, usize>,
    id_index: HashMap<MovieId, usize>,
}

impl MovieTable {
    /// Build a table and its lookup maps from ordered records
    pub fn new(records: Vec<MovieRecord>) -> Self {
        let mut title_index = HashMap::with_capacity(records.len());
        let mut id_index = HashMap::with_capacity(records.len());

        // First match wins on duplicates
        for (row, record) in records.iter().enumerate() {
            title_index.entry(record.title.clone()).or_insert(row);
            id_index.entry(record.id).or_insert(row);
        }

        Self {
            records,
            title_index,
            id_index,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in row order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Get the record at a matrix row
    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.records.get(row)
    }

    /// Titles in row order (the selection list)
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.title.as_str())
    }

    /// Row of the first record whose title equals `title` exactly
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Row of the first record with this id
    pub fn index_of_id(&self, id: MovieId) -> Option<usize> {
        self.id_index.get(&id).copied()
    }

    /// Case-insensitive title search.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches,
    /// each group in row order.
    pub fn search(&self, query: &str) -> Vec<(usize, &MovieRecord)> {
        let query = query.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for (row, record) in self.records.iter().enumerate() {
            let title = record.title.to_lowercase();
            if title == query {
                exact.push((row, record));
            } else if title.contains(&query) {
                partial.push((row, record));
            }
        }

        exact.extend(partial);
        exact
    }
}

impl From<Vec<MovieRecord>> for MovieTable {
    fn from(records: Vec<MovieRecord>) -> Self {
        Self::new(records)
    }
}

impl From<MovieTable> for Vec<MovieRecord> {
    fn from(table: MovieTable) -> Self {
        table.records
    }
}

// The lookup maps are derived, so equality is over records only
impl PartialEq for MovieTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Dense square matrix of similarity scores, stored row-major.
///
/// `get(i, j)` is the similarity between the movies at rows `i` and `j`.
/// Deserialization goes through `RawMatrix` so a decoded matrix always
/// satisfies `values.len() == dim * dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct SimilarityMatrix {
    dim: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl TryFrom<RawMatrix> for SimilarityMatrix {
    type Error = DataLoadError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        SimilarityMatrix::new(raw.dim, raw.values)
    }
}

impl SimilarityMatrix {
    /// Wrap a row-major buffer, checking it is `dim x dim`
    pub fn new(dim: usize, values: Vec<f64>) -> Result<Self> {
        let expected = dim
            .checked_mul(dim)
            .ok_or(DataLoadError::MatrixShape {
                dim,
                expected: usize::MAX,
                found: values.len(),
            })?;
        if values.len() != expected {
            return Err(DataLoadError::MatrixShape {
                dim,
                expected,
                found: values.len(),
            });
        }
        Ok(Self { dim, values })
    }

    /// Build from nested rows; every row must have as many entries as there are rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        let values: Vec<f64> = rows.into_iter().flatten().collect();
        Self::new(dim, values)
    }

    pub fn rows(&self) -> usize {
        self.dim
    }

    pub fn cols(&self) -> usize {
        self.dim
    }

    /// One row of scores, or `None` if out of range
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.dim {
            return None;
        }
        let start = i * self.dim;
        Some(&self.values[start..start + self.dim])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i)?.get(j).copied()
    }

    /// The whole row-major buffer
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_title_lookup_first_match_wins() {
        let table = MovieTable::new(vec![
            record(10, "Heat"),
            record(11, "Alien"),
            record(12, "Heat"),
        ]);

        assert_eq!(table.index_of_title("Heat"), Some(0));
        assert_eq!(table.index_of_title("Alien"), Some(1));
        assert_eq!(table.index_of_title("heat"), None);
        assert_eq!(table.index_of_id(12), Some(2));
        assert_eq!(table.index_of_id(99), None);
    }

    #[test]
    fn test_search_puts_exact_matches_first() {
        let table = MovieTable::new(vec![
            record(1, "Alien Resurrection"),
            record(2, "Aliens"),
            record(3, "Alien"),
            record(4, "Heat"),
        ]);

        let rows: Vec<usize> = table.search("ALIEN").into_iter().map(|(row, _)| row).collect();
        assert_eq!(rows, vec![2, 0, 1]);
        assert!(table.search("zzz").is_empty());
    }

    #[test]
    fn test_matrix_rejects_wrong_length() {
        let err = SimilarityMatrix::new(2, vec![1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MatrixShape {
                dim: 2,
                expected: 4,
                found: 3
            }
        ));

        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]).is_err());
    }

    #[test]
    fn test_matrix_rows() {
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.25], vec![0.25, 1.0]]).unwrap();

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.row(1), Some(&[0.25, 1.0][..]));
        assert_eq!(matrix.get(0, 1), Some(0.25));
        assert!(matrix.row(2).is_none());
        assert!(matrix.get(0, 2).is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = MovieTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.titles().count(), 0);
        assert!(table.get(0).is_none());
    }
}
