//! Pair classification and combined-matrix assembly
//!
//! Walks the pivot table of every selected configuration in row-major order,
//! labels each (A, B) cell against the cutoff, and accumulates the pair's
//! precomputed feature matrix under that label. Unfinished pair directories
//! are excluded; a finished pair without its matrix file aborts the run.

use crate::label::{Label, DEFAULT_CUTOFF};
use crate::matrix::{CombinedMatrix, FeatureMatrix, MatrixBuilder, MatrixError};
use crate::pivot::{pivot_tables, PivotTable};
use crate::runtimes::RuntimeTable;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker file a pair directory must contain to count as finished
pub const COMPLETED_MARKER: &str = "completed";

/// Default per-pair feature matrix filename
pub const DEFAULT_MATRIX_FILE: &str = "matrix_X_uncore_shared.csv";

/// Default combined-matrix output filename
pub const DEFAULT_OUTPUT_FILE: &str = "wekka_xy_L3-SMT_uncore_shared.csv";

/// Errors for matrix assembly
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("No feature matrix {path} found, run the pair matrix builder first")]
    MissingMatrix { path: PathBuf },

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

pub type Result<T> = std::result::Result<T, AssembleError>;

/// Assembly settings, with the defaults of the original experiment campaign
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Normalized-runtime threshold: strictly above it a pair is contending
    pub cutoff: f64,

    /// Configurations whose pivot tables feed the combined matrix
    pub configs: Vec<String>,

    /// Feature matrix filename looked up in every pair directory
    pub matrix_file: String,

    /// Output filename, created under the results root
    pub output_file: String,

    /// Whether A-vs-A diagonal cells are classified like any other cell
    pub include_self_pairs: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            cutoff: DEFAULT_CUTOFF,
            configs: vec!["L3-SMT".to_string()],
            matrix_file: DEFAULT_MATRIX_FILE.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            include_self_pairs: true,
        }
    }
}

/// Assemble the combined labeled matrix for every selected configuration.
///
/// Pairs are visited in pivot row-major order, so identical inputs produce
/// identical output.
pub fn assemble(
    results_root: &Path,
    runtimes: &RuntimeTable,
    config: &AssemblerConfig,
) -> Result<CombinedMatrix> {
    let mut builder = MatrixBuilder::new();

    for table in pivot_tables(runtimes) {
        if !config.configs.iter().any(|c| c == table.config()) {
            tracing::debug!("configuration {} not selected, skipped", table.config());
            continue;
        }
        assemble_config(results_root, &table, config, &mut builder)?;
    }

    Ok(builder.finish())
}

fn assemble_config(
    results_root: &Path,
    table: &PivotTable,
    config: &AssemblerConfig,
    builder: &mut MatrixBuilder,
) -> Result<()> {
    for (a, b, normalized_runtime) in table.iter() {
        if a == b && !config.include_self_pairs {
            tracing::debug!("self pair {a} vs {b} skipped");
            continue;
        }

        let label = Label::classify(normalized_runtime, config.cutoff);
        let results_path = results_root
            .join(table.config())
            .join(format!("{a}_vs_{b}"));

        if !results_path.join(COMPLETED_MARKER).exists() {
            println!("Excluding unfinished directory {}", results_path.display());
            continue;
        }

        let matrix_path = results_path.join(&config.matrix_file);
        if !matrix_path.exists() {
            return Err(AssembleError::MissingMatrix { path: matrix_path });
        }

        let matrix = FeatureMatrix::from_csv_path(&matrix_path)?;
        tracing::debug!(
            "{} vs {} under {}: {} rows labeled {}",
            a,
            b,
            table.config(),
            matrix.row_count(),
            label
        );
        builder.push(matrix, label)?;
    }

    Ok(())
}
