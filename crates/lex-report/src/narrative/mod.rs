//! Narrative summary of a cleaning run.
//!
//! The text is assembled from [`SourceInfo`], [`CleaningReport`] and
//! [`Metrics`] only, so the same inputs always produce the same paragraphs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleaner::CleaningReport;
use crate::config::{DEFAULT_CATEGORY_LABEL, ReportConfig};
use crate::metrics::Metrics;
use crate::types::SourceInfo;
use crate::utils::format_decimal;

/// Ordered narrative paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub paragraphs: Vec<String>,
}

impl Narrative {
    /// Paragraphs joined by newlines.
    pub fn to_text(&self) -> String {
        self.paragraphs.join("\n")
    }

    /// Non-blank lines of the text, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.paragraphs
            .iter()
            .flat_map(|p| p.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Renders the narrative.
#[derive(Debug, Clone)]
pub struct NarrativeGenerator {
    category_label: String,
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_LABEL)
    }
}

impl NarrativeGenerator {
    pub fn new(category_label: impl Into<String>) -> Self {
        Self {
            category_label: category_label.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.category_label.clone())
    }

    pub fn generate(
        &self,
        source: &SourceInfo,
        report: &CleaningReport,
        metrics: &Metrics,
    ) -> Narrative {
        let mut paragraphs = vec![
            format!(
                "Source file: {}. The original dataset had {} columns: {}.",
                source.file_name,
                report.original_columns.len(),
                report.original_columns.join(", ")
            ),
            format!(
                "After processing, the dataset contains {} rows and {} columns: {}.",
                metrics.row_count,
                metrics.column_count,
                report.cleaned_columns.join(", ")
            ),
            format!(
                "Columns removed during de-duplication: {}.",
                if report.removed_columns.is_empty() {
                    "None".to_string()
                } else {
                    report.removed_columns.join(", ")
                }
            ),
            format!(
                "Data quality score: {}%. Duplicate rows removed: {}. Total null values: {}.",
                format_decimal(metrics.quality_score),
                report.duplicate_rows_removed,
                metrics.total_nulls
            ),
        ];

        if let Some((column, stats)) = metrics.highest_mean() {
            paragraphs.push(format!(
                "The numeric column with the highest mean is {} (mean {}).",
                column,
                format_decimal(stats.mean)
            ));
        }

        if let Some(top) = metrics.top_category() {
            paragraphs.push(format!(
                "The most frequent {} is {} with {} records.",
                self.category_label.to_lowercase(),
                top.label,
                top.count
            ));
        }

        debug!("Narrative has {} paragraphs", paragraphs.len());
        Narrative { paragraphs }
    }
}
