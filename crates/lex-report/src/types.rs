use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cleaner::CleaningReport;
use crate::metrics::Metrics;
use crate::narrative::Narrative;
use crate::reporting::{DocumentSpec, WorkbookSpec};
use crate::table::{DATETIME_FORMAT, Table};

/// Sortable timestamp used in artifact file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Identity of the processed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub generated_at: NaiveDateTime,
}

impl SourceInfo {
    /// Source stamped with the current local time.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::at(file_name, Local::now().naive_local())
    }

    pub fn at(file_name: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            file_name: file_name.into(),
            generated_at,
        }
    }

    /// `generated_at` in [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// `generated_at` for display.
    pub fn generated_at_display(&self) -> String {
        self.generated_at.format(DATETIME_FORMAT).to_string()
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// (rows, columns) of the table before cleaning.
    pub original_shape: (usize, usize),
    pub cleaned: Table,
    pub cleaning_report: CleaningReport,
    pub metrics: Metrics,
    pub narrative: Narrative,
    pub workbook: WorkbookSpec,
    pub document: DocumentSpec,
    pub duration_ms: u64,
}
