//! Runtime-table loading
//!
//! The benchmark harness records one row per pair experiment in
//! `runtimes.csv` under the results root: the experiment configuration, the
//! two co-located workloads, and workload A's runtime normalized against its
//! solo run. An empty runtime cell means the pair was never measured under
//! that configuration.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Filename of the runtime table below the results root
pub const RUNTIMES_FILE: &str = "runtimes.csv";

/// One measured pair experiment
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeRecord {
    /// Experiment configuration (e.g. "L3-SMT")
    pub config: String,

    /// Workload whose slowdown is measured
    #[serde(rename = "A")]
    pub a: String,

    /// Workload it was co-located with
    #[serde(rename = "B")]
    pub b: String,

    /// A's runtime divided by its solo runtime; >1.0 indicates contention
    pub normalized_runtime: Option<f64>,
}

/// All runtime records of one results root, in file order
#[derive(Debug, Clone, Default)]
pub struct RuntimeTable {
    records: Vec<RuntimeRecord>,
}

impl RuntimeTable {
    /// Load `runtimes.csv` from a results root directory
    pub fn from_results_root(results_root: &Path) -> Result<Self> {
        Self::from_csv_path(&results_root.join(RUNTIMES_FILE))
    }

    /// Load and parse a runtime table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("runtime table not found: {}", path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("failed to open runtime table {}", path.display()))?;

        let mut records = Vec::new();
        for (row, record) in reader.deserialize::<RuntimeRecord>().enumerate() {
            // +2: one for the header line, one for 1-based line numbers
            let record = record.with_context(|| {
                format!("invalid runtime record at {}:{}", path.display(), row + 2)
            })?;
            records.push(record);
        }

        Ok(RuntimeTable { records })
    }

    /// Build a table from already-parsed records
    pub fn from_records(records: Vec<RuntimeRecord>) -> Self {
        RuntimeTable { records }
    }

    pub fn records(&self) -> &[RuntimeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
