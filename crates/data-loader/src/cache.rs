//! Persistence of the cached artifact pair.
//!
//! The pair is two bincode files in the model directory:
//! - `movie_list.bin`: the `{id, title}` table
//! - `similarity.bin`: the dense similarity matrix
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves either the old file or the new one. Reads never
//! fail hard: anything wrong with the cache is reported as a
//! `CacheRejection` inside `CacheOutcome` and the caller rebuilds.

use crate::error::{CacheRejection, DataLoadError, Result};
use crate::types::{MovieTable, SimilarityMatrix};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const MOVIE_LIST_FILE: &str = "movie_list.bin";
pub const SIMILARITY_FILE: &str = "similarity.bin";

/// Locations of the two cache files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub movie_list: PathBuf,
    pub similarity: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            movie_list: dir.join(MOVIE_LIST_FILE),
            similarity: dir.join(SIMILARITY_FILE),
        }
    }

    /// Both files are present
    pub fn exist(&self) -> bool {
        self.movie_list.is_file() && self.similarity.is_file()
    }
}

/// Result of trying to read the cache
#[derive(Debug)]
pub enum CacheOutcome {
    /// Both artifacts decoded and agree on their dimensions
    Hit {
        table: MovieTable,
        matrix: SimilarityMatrix,
    },
    /// At least one file does not exist
    Absent,
    /// Files exist but can't be trusted
    Rejected(CacheRejection),
}

/// Read and validate the cached pair
#[instrument(skip_all)]
pub fn load_artifacts(paths: &ArtifactPaths) -> CacheOutcome {
    if !paths.exist() {
        debug!("No cached artifacts found");
        return CacheOutcome::Absent;
    }

    let table: MovieTable = match read_artifact(&paths.movie_list) {
        Ok(table) => table,
        Err(rejection) => return CacheOutcome::Rejected(rejection),
    };
    let matrix: SimilarityMatrix = match read_artifact(&paths.similarity) {
        Ok(matrix) => matrix,
        Err(rejection) => return CacheOutcome::Rejected(rejection),
    };

    if table.len() != matrix.rows() || table.len() != matrix.cols() {
        return CacheOutcome::Rejected(CacheRejection::ShapeMismatch {
            records: table.len(),
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    debug!("Loaded cached artifacts for {} movies", table.len());
    CacheOutcome::Hit { table, matrix }
}

/// Persist the pair, fully replacing any previous cache
#[instrument(skip_all, fields(records = table.len()))]
pub fn save_artifacts(
    paths: &ArtifactPaths,
    table: &MovieTable,
    matrix: &SimilarityMatrix,
) -> Result<()> {
    write_artifact(&paths.movie_list, table)?;
    write_artifact(&paths.similarity, matrix)?;
    info!(
        "Saved artifacts to {} and {}",
        paths.movie_list.display(),
        paths.similarity.display()
    );
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, CacheRejection> {
    let file = File::open(path).map_err(|e| CacheRejection::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    bincode::deserialize_from(BufReader::new(file)).map_err(|e| CacheRejection::Corrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    bincode::serialize_into(&mut writer, value).map_err(|e| DataLoadError::EncodeError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    writer.flush()?;
    drop(writer);

    if let Err(e) = fs::rename(&tmp_path, path) {
        // Leave no stray temp file behind
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieRecord;

    fn sample_pair() -> (MovieTable, SimilarityMatrix) {
        let table = MovieTable::new(vec![
            MovieRecord {
                id: 1,
                title: "Alpha".to_string(),
            },
            MovieRecord {
                id: 2,
                title: "Beta".to_string(),
            },
        ]);
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.123456789], vec![0.123456789, 1.0]])
                .unwrap();
        (table, matrix)
    }

    #[test]
    fn test_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(&dir.path().join("model"));
        let (table, matrix) = sample_pair();

        save_artifacts(&paths, &table, &matrix).unwrap();

        match load_artifacts(&paths) {
            CacheOutcome::Hit {
                table: loaded_table,
                matrix: loaded_matrix,
            } => {
                assert_eq!(loaded_table, table);
                assert_eq!(loaded_matrix, matrix);
                // Lookup maps are rebuilt on decode
                assert_eq!(loaded_table.index_of_title("Beta"), Some(1));
            }
            other => panic!("expected cache hit, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_when_either_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        assert!(matches!(load_artifacts(&paths), CacheOutcome::Absent));

        let (table, matrix) = sample_pair();
        save_artifacts(&paths, &table, &matrix).unwrap();
        fs::remove_file(&paths.similarity).unwrap();
        assert!(matches!(load_artifacts(&paths), CacheOutcome::Absent));
    }

    #[test]
    fn test_garbage_is_rejected_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.movie_list, b"not bincode").unwrap();
        fs::write(&paths.similarity, b"\x01").unwrap();

        match load_artifacts(&paths) {
            CacheOutcome::Rejected(CacheRejection::Corrupt { .. }) => {}
            other => panic!("expected corrupt rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (table, _) = sample_pair();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        save_artifacts(&paths, &table, &matrix).unwrap();

        match load_artifacts(&paths) {
            CacheOutcome::Rejected(CacheRejection::ShapeMismatch { records, rows, cols }) => {
                assert_eq!((records, rows, cols), (2, 1, 1));
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (table, matrix) = sample_pair();
        save_artifacts(&paths, &table, &matrix).unwrap();

        let smaller = MovieTable::new(vec![MovieRecord {
            id: 9,
            title: "Solo".to_string(),
        }]);
        let smaller_matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        save_artifacts(&paths, &smaller, &smaller_matrix).unwrap();

        match load_artifacts(&paths) {
            CacheOutcome::Hit { table, .. } => assert_eq!(table.len(), 1),
            other => panic!("expected cache hit, got {other:?}"),
        }
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }
}
