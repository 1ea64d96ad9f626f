//! Tabular dataset loading with format auto-detection
//!
//! The PulseBat workbook ships one table per measurement segment ("SOC ALL",
//! "SOC 5%", ..). Exported to disk that becomes a directory of tables, so a
//! segment name selects a file inside the dataset directory; a direct file
//! path is loaded as-is.

use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{probe_names, Dataset, TARGET_COLUMN};
use crate::error::{CellHealthError, Result};

const SEGMENT_EXTENSIONS: &[&str] = &["csv", "tsv", "json", "parquet"];

/// Load a dataset from `path`, selecting `segment` when `path` is a directory.
///
/// Fails with `DataUnavailable` if the source cannot be opened,
/// `SchemaMismatch` if any of U1..U21 or SOH is absent, and
/// `MalformedRecord` on the first missing or non-numeric cell.
pub fn load_dataset(path: &Path, segment: Option<&str>) -> Result<Dataset> {
    let resolved = resolve_segment_path(path, segment)?;
    let df = read_frame(&resolved)?;
    info!(
        rows = df.height(),
        cols = df.width(),
        path = %resolved.display(),
        "loaded table"
    );
    frame_to_dataset(&df)
}

fn resolve_segment_path(path: &Path, segment: Option<&str>) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CellHealthError::DataUnavailable(format!(
            "{} does not exist",
            path.display()
        )));
    }

    if path.is_dir() {
        let segment = segment.ok_or_else(|| {
            CellHealthError::DataUnavailable(format!(
                "{} is a directory; a segment name is required to pick a table",
                path.display()
            ))
        })?;
        for ext in SEGMENT_EXTENSIONS {
            let candidate = path.join(format!("{segment}.{ext}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        return Err(CellHealthError::DataUnavailable(format!(
            "segment {segment:?} not found under {}",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let unavailable = |e: PolarsError| CellHealthError::DataUnavailable(e.to_string());

    match ext.as_str() {
        "csv" | "tsv" => {
            let separator = if ext == "tsv" { b'\t' } else { b',' };
            let parse_opts = CsvParseOptions::default().with_separator(separator);
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(1000))
                .with_parse_options(parse_opts)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .map_err(unavailable)?
                .finish()
                .map_err(unavailable)
        }
        "json" | "jsonl" => {
            let file = open_source(path)?;
            JsonReader::new(file).finish().map_err(unavailable)
        }
        "parquet" | "pq" => {
            let file = open_source(path)?;
            ParquetReader::new(file).finish().map_err(unavailable)
        }
        other => Err(CellHealthError::DataUnavailable(format!(
            "unsupported file format {other:?} for {}",
            path.display()
        ))),
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        CellHealthError::DataUnavailable(format!("{}: {e}", path.display()))
    })
}

/// Validate the schema and convert the frame into a dense numeric dataset.
fn frame_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let feature_cols = probe_names();
    let mut required: Vec<&str> = feature_cols.iter().map(|s| s.as_str()).collect();
    required.push(TARGET_COLUMN);

    let missing: Vec<String> = required
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CellHealthError::SchemaMismatch { missing });
    }

    let n_rows = df.height();
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(required.len());
    for name in &required {
        columns.push(column_values(df, name)?);
    }

    let target = Array1::from_vec(columns.pop().expect("target column collected last"));
    let col_refs: Vec<&[f64]> = columns.iter().map(|c| c.as_slice()).collect();
    let features =
        Array2::from_shape_fn((n_rows, feature_cols.len()), |(r, c)| col_refs[c][r]);

    Dataset::new(features, target)
}

/// Extract one required column as f64, rejecting the first null or
/// unparsable cell.
fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| CellHealthError::SchemaMismatch {
            missing: vec![name.to_string()],
        })?;

    // Non-strict cast turns unparsable strings into nulls, so a single null
    // scan catches both missing and non-numeric cells.
    let casted = series
        .cast(&DataType::Float64)
        .map_err(|_| CellHealthError::MalformedRecord {
            row: 0,
            column: name.to_string(),
        })?;
    let values = casted
        .f64()
        .map_err(|e| CellHealthError::DataUnavailable(e.to_string()))?;

    let mut out = Vec::with_capacity(values.len());
    for (row, v) in values.into_iter().enumerate() {
        match v {
            Some(x) => out.push(x),
            None => {
                return Err(CellHealthError::MalformedRecord {
                    row,
                    column: name.to_string(),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::N_PROBES;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, rows: &[Vec<String>]) -> PathBuf {
        let mut header: Vec<String> = probe_names();
        header.push(TARGET_COLUMN.to_string());

        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", header.join(",")).unwrap();
        for row in rows {
            writeln!(file, "{}", row.join(",")).unwrap();
        }
        path
    }

    fn numeric_row(soh: f64) -> Vec<String> {
        let mut row: Vec<String> = (0..N_PROBES).map(|i| format!("{:.2}", 3.0 + i as f64 * 0.01)).collect();
        row.push(format!("{soh}"));
        row
    }

    #[test]
    fn test_load_valid_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "cells.csv", &[numeric_row(0.91), numeric_row(0.55)]);

        let ds = load_dataset(&path, None).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.target()[1], 0.55);
        assert_eq!(ds.feature_names()[0], "U1");
    }

    #[test]
    fn test_segment_selects_table_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "SOC ALL.csv", &[numeric_row(0.8)]);

        let ds = load_dataset(dir.path(), Some("SOC ALL")).unwrap();
        assert_eq!(ds.len(), 1);

        let err = load_dataset(dir.path(), Some("SOC 5%")).unwrap_err();
        assert!(matches!(err, CellHealthError::DataUnavailable(_)));
    }

    #[test]
    fn test_missing_columns_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "U1,U2,SOH").unwrap();
        writeln!(file, "3.1,3.2,0.9").unwrap();

        let err = load_dataset(&path, None).unwrap_err();
        match err {
            CellHealthError::SchemaMismatch { missing } => {
                assert!(missing.contains(&"U3".to_string()));
                assert!(!missing.contains(&"SOH".to_string()));
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_cell_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = numeric_row(0.7);
        bad[4] = "n/a".to_string();
        let path = write_csv(dir.path(), "cells.csv", &[numeric_row(0.9), bad]);

        let err = load_dataset(&path, None).unwrap_err();
        match err {
            CellHealthError::MalformedRecord { row, column } => {
                assert_eq!(row, 1);
                assert_eq!(column, "U5");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = load_dataset(Path::new("/no/such/cells.csv"), None).unwrap_err();
        assert!(matches!(err, CellHealthError::DataUnavailable(_)));
    }
}
