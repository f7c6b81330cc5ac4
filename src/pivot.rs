//! Pivot tables over the runtime table
//!
//! One table per configuration: cell (A, B) holds workload A's normalized
//! runtime when co-located with workload B. Axes are kept sorted so cell
//! iteration is row-major and deterministic.

use crate::runtimes::RuntimeTable;
use std::collections::BTreeMap;

/// Pairwise normalized runtimes of one configuration
#[derive(Debug, Clone)]
pub struct PivotTable {
    config: String,
    cells: BTreeMap<String, BTreeMap<String, f64>>,
}

impl PivotTable {
    fn new(config: &str) -> Self {
        PivotTable {
            config: config.to_string(),
            cells: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    /// Normalized runtime of A when co-located with B, if measured
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.cells.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Number of measured cells
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in row-major order: row A, then its columns B
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.cells.iter().flat_map(|(a, row)| {
            row.iter()
                .map(move |(b, value)| (a.as_str(), b.as_str(), *value))
        })
    }
}

/// Pivot the runtime table into one table per configuration, sorted by
/// configuration name. Duplicate (A, B) measurements keep the last record.
pub fn pivot_tables(runtimes: &RuntimeTable) -> Vec<PivotTable> {
    let mut by_config: BTreeMap<String, PivotTable> = BTreeMap::new();

    for record in runtimes.records() {
        let Some(value) = record.normalized_runtime else {
            tracing::debug!(
                "no runtime for {} vs {} under {}, cell skipped",
                record.a,
                record.b,
                record.config
            );
            continue;
        };

        by_config
            .entry(record.config.clone())
            .or_insert_with(|| PivotTable::new(&record.config))
            .cells
            .entry(record.a.clone())
            .or_default()
            .insert(record.b.clone(), value);
    }

    by_config.into_values().collect()
}
