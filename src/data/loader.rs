use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    Movie, MovieTable, GENRE_COLUMN, LANGUAGE_COLUMN, NAME_COLUMN, RATING_COLUMN,
    REQUIRED_COLUMNS, VOTES_COLUMN, YEAR_COLUMN,
};

// ---------------------------------------------------------------------------
// Structural load failures
// ---------------------------------------------------------------------------

/// Problems with the shape of the source, as opposed to individual cells.
/// Malformed cells never fail a load; they become missing values.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
}

fn check_columns(present: impl Fn(&str) -> bool) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present(**c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a movie table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the movie columns (the native format)
/// * `.json`    – `[{ "Movie Name": ..., "Year": ..., ... }, ...]`
/// * `.parquet` – one column per attribute, string or numeric types
pub fn load_file(path: &Path) -> Result<MovieTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            read_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(SchemaError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading movie table from {}", path.display()))?;

    log::info!("Loaded {} movies from {}", table.len(), path.display());
    for (column, missing) in table.missing_counts() {
        if missing > 0 {
            log::warn!("{missing} record(s) have a missing or malformed '{column}' value");
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Assemble a [`Movie`] from raw cell text looked up by column header.
fn movie_from_cells(mut cell: impl FnMut(&'static str) -> Option<String>) -> Movie {
    Movie {
        name: cell(NAME_COLUMN).as_deref().and_then(parse_text),
        year: cell(YEAR_COLUMN).as_deref().and_then(parse_year),
        genre: cell(GENRE_COLUMN).as_deref().and_then(parse_text),
        rating: cell(RATING_COLUMN).as_deref().and_then(parse_rating),
        votes: cell(VOTES_COLUMN).as_deref().and_then(parse_votes),
        language: cell(LANGUAGE_COLUMN).as_deref().and_then(parse_text),
    }
}

fn parse_text(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Whole number from `"2013"`, `"2013.0"` or `"(2013)"`.
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s)
        .trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i32)
}

/// Rating out of ten; anything outside `0..=10` is treated as missing.
fn parse_rating(s: &str) -> Option<f64> {
    let r = s.trim().parse::<f64>().ok()?;
    (0.0..=10.0).contains(&r).then_some(r)
}

/// Non-negative vote count, thousands separators allowed (`"1,234"`).
fn parse_votes(s: &str) -> Option<u64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if let Ok(v) = cleaned.parse::<u64>() {
        return Some(v);
    }
    let f = cleaned.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least the six movie columns, in any
/// order. Extra columns are ignored. Short rows leave trailing fields missing;
/// rows the CSV reader cannot decode at all are skipped with a warning.
pub fn read_csv<R: Read>(source: R) -> Result<MovieTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    check_columns(|c| headers.iter().any(|h| h == c))?;
    let position = |col: &str| headers.iter().position(|h| h == col);

    let mut movies = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping CSV row {row_no}: {e}");
                continue;
            }
        };
        movies.push(movie_from_cells(|col| {
            position(col)
                .and_then(|i| record.get(i))
                .map(str::to_string)
        }));
    }

    Ok(MovieTable::from_movies(movies))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Movie Name": "Drishyam", "Year": 2013, "Genre": "Thriller",
///     "Rating(10)": 8.2, "Votes": "50,000", "Language": "Malayalam" },
///   ...
/// ]
/// ```
///
/// A column counts as present when at least one record has the key. An empty
/// array carries no columns to check and loads as an empty table, the same
/// as a header-only CSV.
pub fn read_json(text: &str) -> Result<MovieTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().ok_or(SchemaError::NotAnArray)?;

    if !records.is_empty() {
        check_columns(|c| {
            records
                .iter()
                .any(|r| r.as_object().is_some_and(|o| o.contains_key(c)))
        })?;
    }

    let mut movies = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            continue;
        };
        movies.push(movie_from_cells(|col| obj.get(col).and_then(json_cell)));
    }

    Ok(MovieTable::from_movies(movies))
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per movie attribute.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` binary. Numeric attributes may be stored
/// as integers, floats or strings; every cell goes through the same coercion
/// as the CSV loader.
fn load_parquet(path: &Path) -> Result<MovieTable> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    check_columns(|c| builder.schema().index_of(c).is_ok())?;
    let reader = builder.build().context("building parquet reader")?;

    let mut movies = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for col in REQUIRED_COLUMNS {
            let idx = schema.index_of(col).context("column vanished between batches")?;
            columns.push((col, batch.column(idx).clone()));
        }

        for row in 0..batch.num_rows() {
            movies.push(movie_from_cells(|col| {
                columns
                    .iter()
                    .find(|(name, _)| *name == col)
                    .and_then(|(_, array)| arrow_cell(array, row))
            }));
        }
    }

    Ok(MovieTable::from_movies(movies))
}

/// Extract a single cell from an Arrow column as text, `None` for null.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        _ => array_value_to_string(col, row).ok(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::CategoryField;

    const HEADER: &str = "Movie Name,Year,Genre,Rating(10),Votes,Language\n";

    #[test]
    fn csv_rows_map_to_typed_records() {
        let csv = format!(
            "{HEADER}The Shawshank Redemption,1994,Drama,9.3,2000000,English\n\
             Drishyam,2013,Thriller,8.2,\"50,000\",Malayalam\n"
        );
        let table = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.movies()[1],
            Movie {
                name: Some("Drishyam".into()),
                year: Some(2013),
                genre: Some("Thriller".into()),
                rating: Some(8.2),
                votes: Some(50_000),
                language: Some("Malayalam".into()),
            }
        );
    }

    #[test]
    fn malformed_cells_become_missing() {
        let csv = format!("{HEADER}Odd One,unknown,,11.5,N/A,Hindi\nShort Row,2001\n");
        let table = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let odd = &table.movies()[0];
        assert_eq!(odd.name.as_deref(), Some("Odd One"));
        assert_eq!((odd.year, odd.genre.as_deref(), odd.rating, odd.votes), (None, None, None, None));

        let short = &table.movies()[1];
        assert_eq!(short.year, Some(2001));
        assert_eq!(short.language, None);
    }

    #[test]
    fn column_order_is_free_and_extras_are_ignored() {
        let csv = "Language,Votes,Rating(10),Genre,Year,Movie Name,Director\n\
                   Tamil,21000,8.6,Drama,2003,Anbe Sivam,Sundar C\n";
        let table = read_csv(csv.as_bytes()).unwrap();
        let m = &table.movies()[0];
        assert_eq!(m.display_name(), "Anbe Sivam");
        assert_eq!(m.votes, Some(21_000));
        assert_eq!(table.categories(CategoryField::Language), ["Tamil"]);
    }

    #[test]
    fn missing_columns_fail_the_load() {
        let err = read_csv("Movie Name,Year,Genre\nX,2000,Drama\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::MissingColumns(vec![
                "Rating(10)".into(),
                "Votes".into(),
                "Language".into(),
            ]))
        );
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(parse_year("(2013)"), Some(2013));
        assert_eq!(parse_year("2013.0"), Some(2013));
        assert_eq!(parse_year("2013.5"), None);
        assert_eq!(parse_rating("10"), Some(10.0));
        assert_eq!(parse_rating("-0.1"), None);
        assert_eq!(parse_votes("1,234,567"), Some(1_234_567));
        assert_eq!(parse_votes("-3"), None);
        assert_eq!(parse_votes("12.0"), Some(12));
        assert_eq!(parse_text("   "), None);
    }

    #[test]
    fn json_records_accept_numbers_and_strings() {
        let json = r#"[
            {"Movie Name": "Drishyam", "Year": 2013, "Genre": "Thriller",
             "Rating(10)": 8.2, "Votes": "50,000", "Language": "Malayalam"},
            {"Movie Name": null, "Year": "2019", "Genre": "Drama",
             "Rating(10)": "8.6", "Votes": 28000, "Language": "Malayalam"}
        ]"#;
        let table = read_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.movies()[0].votes, Some(50_000));
        assert_eq!(table.movies()[1].name, None);
        assert_eq!(table.movies()[1].rating, Some(8.6));
    }

    #[test]
    fn json_records_without_a_required_column_are_rejected() {
        let json = r#"[
            {"Movie Name": "Drishyam", "Year": 2013, "Genre": "Thriller",
             "Rating(10)": 8.2, "Language": "Malayalam"}
        ]"#;
        let err = read_json(json).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::MissingColumns(vec!["Votes".to_string()]))
        );
    }

    #[test]
    fn empty_json_array_is_an_empty_table() {
        let table = read_json("[]").unwrap();
        assert!(table.is_empty());
        assert!(table.categories(CategoryField::Genre).is_empty());
    }

    #[test]
    fn json_must_be_an_array() {
        let err = read_json(r#"{"Movie Name": "x"}"#).unwrap_err();
        assert_eq!(err.downcast_ref::<SchemaError>(), Some(&SchemaError::NotAnArray));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("movies.CSV");
        let mut f = File::create(&csv_path).unwrap();
        write!(f, "{HEADER}Andhadhun,2018,Crime,8.2,95000,Hindi\n").unwrap();
        drop(f);
        assert_eq!(load_file(&csv_path).unwrap().len(), 1);

        let txt_path = dir.path().join("movies.txt");
        std::fs::write(&txt_path, HEADER).unwrap();
        let err = load_file(&txt_path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::UnsupportedExtension("txt".into()))
        );

        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn parquet_columns_are_coerced() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(NAME_COLUMN, DataType::Utf8, true),
            Field::new(YEAR_COLUMN, DataType::Int64, true),
            Field::new(GENRE_COLUMN, DataType::Utf8, true),
            Field::new(RATING_COLUMN, DataType::Float64, true),
            Field::new(VOTES_COLUMN, DataType::Utf8, true),
            Field::new(LANGUAGE_COLUMN, DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Kumbalangi Nights"), None])),
                Arc::new(Int64Array::from(vec![Some(2019), None])),
                Arc::new(StringArray::from(vec![Some("Drama"), Some("Drama")])),
                Arc::new(Float64Array::from(vec![Some(8.6), Some(12.0)])),
                Arc::new(StringArray::from(vec![Some("28,000"), Some("n/a")])),
                Arc::new(StringArray::from(vec![Some("Malayalam"), Some("Tamil")])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.movies()[0].year, Some(2019));
        assert_eq!(table.movies()[0].votes, Some(28_000));
        assert_eq!(table.movies()[1].name, None);
        assert_eq!(table.movies()[1].rating, None);
        assert_eq!(table.movies()[1].votes, None);
    }
}
