//! Parser for the raw movie dataset.
//!
//! The dataset is a CSV file with a header row (the TMDB 5000 export).
//! Only three columns matter:
//! - `id`: integer movie id (required)
//! - `title`: display title (required)
//! - `overview`: plot synopsis (optional; missing cells become `""`)
//!
//! Fields may be quoted and contain commas or newlines, and other columns
//! hold JSON blobs, so we rely on the `csv` crate for record splitting and
//! only do the projection and normalization here.
//!
//! Rows whose `id` is empty or not an integer are skipped with a warning.

use crate::error::{DataLoadError, Result};
use crate::types::{MovieDocument, MovieId};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, instrument, warn};

const ID_COLUMN: &str = "id";
const TITLE_COLUMN: &str = "title";
const OVERVIEW_COLUMN: &str = "overview";

/// Column positions found in the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    title: usize,
    overview: Option<usize>,
}

/// Parse the dataset file at `path`.
///
/// Fails with `MissingDataset` if the file does not exist and with
/// `MalformedDataset` if the `id` or `title` column is absent.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_movies(path: &Path) -> Result<Vec<MovieDocument>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::MissingDataset {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    let movies = parse_movies_from_reader(file, &path.display().to_string())?;
    debug!("Parsed {} movies", movies.len());
    Ok(movies)
}

/// Parse dataset rows from any reader.
///
/// `source` names the input in error messages.
pub fn parse_movies_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<MovieDocument>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.byte_headers()?.clone();
    let columns = locate_columns(&headers, source)?;

    let mut movies = Vec::new();
    let mut skipped = 0usize;
    for result in csv_reader.byte_records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Skip blank trailing lines
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let id_field = field_text(&record, columns.id);
        let id: MovieId = match id_field.trim().parse() {
            Ok(id) => id,
            Err(e) => {
                debug!(
                    "Skipping line {} of {}: invalid id {:?} ({})",
                    line, source, id_field, e
                );
                skipped += 1;
                continue;
            }
        };

        let title = field_text(&record, columns.title);
        let overview = columns
            .overview
            .map(|idx| field_text(&record, idx))
            .unwrap_or_default();

        movies.push(MovieDocument {
            id,
            title,
            overview,
        });
    }

    if skipped > 0 {
        warn!("Skipped {} rows with an invalid id in {}", skipped, source);
    }
    Ok(movies)
}

/// Find the required columns by header name
fn locate_columns(headers: &csv::ByteRecord, source: &str) -> Result<Columns> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| String::from_utf8_lossy(h).trim() == name)
    };

    let missing: Vec<&str> = [ID_COLUMN, TITLE_COLUMN]
        .into_iter()
        .filter(|name| position(name).is_none())
        .collect();

    match (position(ID_COLUMN), position(TITLE_COLUMN)) {
        (Some(id), Some(title)) => Ok(Columns {
            id,
            title,
            overview: position(OVERVIEW_COLUMN),
        }),
        _ => Err(DataLoadError::MalformedDataset {
            path: source.to_string(),
            reason: format!("missing required column(s): {}", missing.join(", ")),
        }),
    }
}

/// Read a field as text.
///
/// Absent fields (short rows) become an empty string, and invalid UTF-8 is
/// replaced rather than rejected so one bad synopsis can't sink the build.
fn field_text(record: &csv::ByteRecord, idx: usize) -> String {
    record
        .get(idx)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<MovieDocument>> {
        parse_movies_from_reader(text.as_bytes(), "test.csv")
    }

    #[test]
    fn test_parse_projects_required_columns() {
        let csv = "budget,id,overview,title\n\
                   100,19995,\"A paraplegic Marine, on Pandora.\",Avatar\n\
                   200,285,Captain Barbossa returns.,Pirates of the Caribbean\n";

        let movies = parse(csv).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 19995);
        assert_eq!(movies[0].title, "Avatar");
        assert_eq!(movies[0].overview, "A paraplegic Marine, on Pandora.");
        assert_eq!(movies[1].id, 285);
    }

    #[test]
    fn test_quoted_fields_with_newlines_and_json() {
        let csv = "id,title,genres,overview\n\
                   1,\"Heat\",\"[{\"\"id\"\": 28, \"\"name\"\": \"\"Action\"\"}]\",\"Line one\nline two\"\n";

        let movies = parse(csv).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Heat");
        assert_eq!(movies[0].overview, "Line one\nline two");
    }

    #[test]
    fn test_missing_overview_becomes_empty() {
        let csv = "id,title,overview\n1,Alpha,\n2,Beta\n";
        let movies = parse(csv).unwrap();
        assert_eq!(movies[0].overview, "");
        assert_eq!(movies[1].overview, "");

        // No overview column at all
        let movies = parse("id,title\n7,Gamma\n").unwrap();
        assert_eq!(movies[0].overview, "");
    }

    #[test]
    fn test_missing_required_column_is_malformed() {
        let err = parse("movie_id,title,overview\n1,Alpha,x\n").unwrap_err();
        match err {
            DataLoadError::MalformedDataset { reason, .. } => assert!(reason.contains("id")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse("id,name\n1,Alpha\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedDataset { .. }));
    }

    #[test]
    fn test_rows_with_invalid_id_are_skipped() {
        let csv = "id,title,overview\n\
                   1,Alpha,x\n\
                   abc,Beta,y\n\
                   ,Gamma,z\n\
                   2.5,Delta,w\n\
                   3,Omega,v\n";

        let movies = parse(csv).unwrap();

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(titles, vec!["Alpha", "Omega"]);
        assert_eq!(movies[1].overview, "v");
    }

    #[test]
    fn test_missing_file_is_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_movies(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDataset { .. }));
    }
}
