//! Metrics module.
//!
//! [`MetricsEngine::compute`] is a pure function of a cleaned [`Table`]:
//! quality score, per-column null counts, numeric descriptive statistics and
//! the frequency table of one categorical column.

mod frequency;
mod statistics;

pub use frequency::CategoryCount;
pub use statistics::NumericStats;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DEFAULT_CATEGORY_COLUMN, ReportConfig};
use crate::table::{ColumnKind, Table};
use crate::utils::round_to;
use frequency::category_frequency;

/// Analytical result for one cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub row_count: usize,
    pub column_count: usize,
    pub total_cells: usize,
    pub total_nulls: usize,
    /// Percentage of non-null cells, two decimal places.
    pub quality_score: f64,
    /// Every column in table order, zeros included.
    pub null_counts: IndexMap<String, usize>,
    /// Numeric columns in table order.
    pub numeric_stats: IndexMap<String, NumericStats>,
    /// Column the frequency table was requested for.
    pub category_column: String,
    /// Empty when the column is absent or entirely null.
    pub category_frequency: Vec<CategoryCount>,
}

impl Metrics {
    /// Numeric column with the highest mean; the first one wins a tie.
    pub fn highest_mean(&self) -> Option<(&str, &NumericStats)> {
        let mut best: Option<(&str, &NumericStats)> = None;
        for (name, stats) in &self.numeric_stats {
            match best {
                Some((_, top)) if stats.mean <= top.mean => {}
                _ => best = Some((name.as_str(), stats)),
            }
        }
        best
    }

    /// Most frequent category value.
    pub fn top_category(&self) -> Option<&CategoryCount> {
        self.category_frequency.first()
    }
}

/// Quality score for a null/cell count pair.
///
/// 100 exactly when nothing is null (including an empty table). A table with
/// any null never rounds up to 100.
pub fn quality_score(total_nulls: usize, total_cells: usize) -> f64 {
    if total_cells == 0 || total_nulls == 0 {
        return 100.0;
    }

    let score = round_to((1.0 - total_nulls as f64 / total_cells as f64) * 100.0, 2);
    score.clamp(0.0, 99.99)
}

/// Computes [`Metrics`] from a cleaned table.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    category_column: String,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
        }
    }
}

impl MetricsEngine {
    /// Engine reporting frequencies for `category_column`.
    ///
    /// The name is trimmed and uppercased to match cleaned headers.
    pub fn new(category_column: impl Into<String>) -> Self {
        Self {
            category_column: category_column.into().trim().to_uppercase(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.category_column.clone())
    }

    pub fn category_column(&self) -> &str {
        &self.category_column
    }

    pub fn compute(&self, table: &Table) -> Metrics {
        let (row_count, column_count) = table.shape();
        let total_cells = row_count * column_count;

        let null_counts: IndexMap<String, usize> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), table.null_count(index)))
            .collect();
        let total_nulls = null_counts.values().sum();
        let quality_score = quality_score(total_nulls, total_cells);

        let mut numeric_stats = IndexMap::new();
        for (index, name) in table.columns().iter().enumerate() {
            if table.column_kind(index) != ColumnKind::Numeric {
                continue;
            }
            let values: Vec<f64> = table
                .column_values(index)
                .filter_map(|cell| cell.as_number())
                .collect();
            if let Some(stats) = NumericStats::from_values(&values) {
                debug!("Numeric stats for '{}': mean {:.4}", name, stats.mean);
                numeric_stats.insert(name.clone(), stats);
            }
        }

        let category_frequency = match table.column(&self.category_column) {
            Some(cells) => category_frequency(cells),
            None => {
                debug!("Category column '{}' not present", self.category_column);
                Vec::new()
            }
        };

        info!(
            "Metrics: {} rows, {} columns, {} nulls, quality score {:.2}%",
            row_count, column_count, total_nulls, quality_score
        );

        Metrics {
            row_count,
            column_count,
            total_cells,
            total_nulls,
            quality_score,
            null_counts,
            numeric_stats,
            category_column: self.category_column.clone(),
            category_frequency,
        }
    }
}
