//! Feature-matrix loading, accumulation, and CSV output
//!
//! Per-pair feature matrices are CSV files of hardware-counter statistics,
//! one row per sample. Field values are carried as their original strings so
//! the combined output is byte-stable across runs. Batches are collected
//! first and concatenated once, with the column schema of the first batch
//! enforced on every later one.

use crate::label::Label;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the label column appended to the combined matrix
pub const LABEL_COLUMN: &str = "Y";

/// Errors for feature-matrix operations
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Failed to read feature matrix {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Feature matrix {path} has columns {actual:?}, expected {expected:?}")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Failed to write combined matrix {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// One pair's feature matrix: header columns plus sample rows
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    source: PathBuf,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FeatureMatrix {
    /// Load a feature matrix from a headered CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let read_err = |source| MatrixError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(read_err)?;

        let columns = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(FeatureMatrix {
            source: path.to_path_buf(),
            columns,
            rows,
        })
    }

    /// Build a matrix directly from rows (used by tests and callers that
    /// already hold the data in memory)
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        FeatureMatrix {
            source: PathBuf::from("<memory>"),
            columns,
            rows,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Accumulates labeled feature-matrix batches and concatenates them once.
///
/// The first accepted batch fixes the column schema; later batches must
/// match it exactly.
#[derive(Debug, Default)]
pub struct MatrixBuilder {
    columns: Option<Vec<String>>,
    batches: Vec<(FeatureMatrix, Label)>,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        MatrixBuilder::default()
    }

    /// Add one pair's matrix; its label is broadcast to every row
    pub fn push(&mut self, matrix: FeatureMatrix, label: Label) -> Result<()> {
        match &self.columns {
            None => self.columns = Some(matrix.columns().to_vec()),
            Some(expected) if expected.as_slice() != matrix.columns() => {
                return Err(MatrixError::SchemaMismatch {
                    path: matrix.source.clone(),
                    expected: expected.clone(),
                    actual: matrix.columns().to_vec(),
                });
            }
            Some(_) => {}
        }

        self.batches.push((matrix, label));
        Ok(())
    }

    /// Rows accumulated so far across all batches
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(|(m, _)| m.row_count()).sum()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Concatenate all batches into the combined matrix
    pub fn finish(self) -> CombinedMatrix {
        let total = self.batches.iter().map(|(m, _)| m.row_count()).sum();
        let mut rows = Vec::with_capacity(total);
        let mut labels = Vec::with_capacity(total);

        for (matrix, label) in self.batches {
            for row in matrix.rows {
                rows.push(row);
                labels.push(label);
            }
        }

        CombinedMatrix {
            columns: self.columns.unwrap_or_default(),
            rows,
            labels,
        }
    }
}

/// The assembled dataset: every included pair's rows plus a per-row label
#[derive(Debug, Clone)]
pub struct CombinedMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    labels: Vec<Label>,
}

impl CombinedMatrix {
    /// (row count, column count) of the output, label column included
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len() + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Header row: feature columns plus the trailing label column
    fn header(&self) -> String {
        let mut headers: Vec<String> = self
            .columns
            .iter()
            .map(|c| Self::escape_field(c))
            .collect();
        headers.push(LABEL_COLUMN.to_string());
        headers.join(",")
    }

    fn format_row(row: &[String], label: Label) -> String {
        let mut fields: Vec<String> = row.iter().map(|f| Self::escape_field(f)).collect();
        fields.push(label.as_str().to_string());
        fields.join(",")
    }

    /// Render the combined matrix as CSV, no row-index column
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for (row, label) in self.rows.iter().zip(&self.labels) {
            output.push_str(&Self::format_row(row, *label));
            output.push('\n');
        }

        output
    }

    /// Write the CSV rendering to a file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_csv()).map_err(|source| MatrixError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_feature_matrix() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("matrix_X_uncore_shared.csv");
        fs::write(&path, "m1,m2\n1.0,2.0\n3.5,4.5\n").unwrap();

        let matrix = FeatureMatrix::from_csv_path(&path).unwrap();
        assert_eq!(matrix.columns(), &["m1".to_string(), "m2".to_string()]);
        assert_eq!(matrix.row_count(), 2);
    }

    #[test]
    fn test_load_ragged_matrix_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("matrix.csv");
        fs::write(&path, "m1,m2\n1.0\n").unwrap();

        let err = FeatureMatrix::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, MatrixError::Read { .. }));
    }

    #[test]
    fn test_builder_concatenates_in_push_order() {
        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1"]), vec![row(&["1"]), row(&["2"])]),
                Label::Contending,
            )
            .unwrap();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1"]), vec![row(&["3"])]),
                Label::Clean,
            )
            .unwrap();

        assert_eq!(builder.row_count(), 3);
        assert_eq!(builder.batch_count(), 2);

        let combined = builder.finish();
        assert_eq!(combined.shape(), (3, 2));
        assert_eq!(
            combined.to_csv(),
            "m1,Y\n\
             1,Y\n\
             2,Y\n\
             3,N\n"
        );
    }

    #[test]
    fn test_builder_rejects_schema_mismatch() {
        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1", "m2"]), vec![row(&["1", "2"])]),
                Label::Clean,
            )
            .unwrap();

        let err = builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1", "m3"]), vec![row(&["1", "2"])]),
                Label::Clean,
            )
            .unwrap_err();

        match err {
            MatrixError::SchemaMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, columns(&["m1", "m2"]));
                assert_eq!(actual, columns(&["m1", "m3"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_builder_rejects_column_reordering() {
        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1", "m2"]), Vec::new()),
                Label::Clean,
            )
            .unwrap();

        let err = builder
            .push(
                FeatureMatrix::from_rows(columns(&["m2", "m1"]), Vec::new()),
                Label::Clean,
            )
            .unwrap_err();
        assert!(matches!(err, MatrixError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_empty_batch_contributes_nothing() {
        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1"]), Vec::new()),
                Label::Contending,
            )
            .unwrap();

        let combined = builder.finish();
        assert_eq!(combined.shape(), (0, 2));
        assert_eq!(combined.to_csv(), "m1,Y\n");
    }

    #[test]
    fn test_empty_builder_yields_header_only_label_column() {
        let combined = MatrixBuilder::new().finish();
        assert_eq!(combined.shape(), (0, 1));
        assert_eq!(combined.to_csv(), "Y\n");
    }

    #[test]
    fn test_escape_field_simple() {
        assert_eq!(CombinedMatrix::escape_field("hello"), "hello");
    }

    #[test]
    fn test_escape_field_with_comma() {
        assert_eq!(
            CombinedMatrix::escape_field("hello,world"),
            "\"hello,world\""
        );
    }

    #[test]
    fn test_escape_field_with_quote() {
        assert_eq!(
            CombinedMatrix::escape_field("say \"hi\""),
            "\"say \"\"hi\"\"\""
        );
    }

    #[test]
    fn test_to_csv_escapes_column_names() {
        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["mean,cycles"]), vec![row(&["1.0"])]),
                Label::Clean,
            )
            .unwrap();

        let csv = builder.finish().to_csv();
        assert!(csv.starts_with("\"mean,cycles\",Y\n"));
    }

    #[test]
    fn test_write_csv_round_trip_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("combined.csv");

        let mut builder = MatrixBuilder::new();
        builder
            .push(
                FeatureMatrix::from_rows(columns(&["m1", "m2"]), vec![row(&["1.0", "2.0"])]),
                Label::Contending,
            )
            .unwrap();
        builder.finish().write_csv(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "m1,m2,Y\n1.0,2.0,Y\n");
    }
}
