//! Report assembly module.
//!
//! Builds two renderer-agnostic payloads from one analytical result:
//! - [`WorkbookSpec`]: sheets, bar charts, the quality-score fill and the
//!   null heatmap
//! - [`DocumentSpec`]: title, metadata, narrative, tables and page template
//!
//! Both read their summary figures from [`summary_rows`], so the workbook and
//! the document always agree on counts and score.

mod document;
mod naming;
mod workbook;

pub use document::{
    DocumentBlock, DocumentSpec, NULL_COUNTS_TABLE, NUMERIC_STATS_TABLE, PAGE_PLACEHOLDER,
    PageTemplate, SUMMARY_TABLE, category_table_title,
};
pub use naming::{ArtifactNames, cell_ref, column_letter, column_range};
pub use workbook::{
    CATEGORY_FREQ_SHEET, CellPosition, ChartKind, ChartSpec, ConditionalFill, DATA_SHEET,
    HeatmapSpec, NULL_COUNTS_SHEET, NUMERIC_STATS_SHEET, SUMMARY_SHEET, SheetSpec, WorkbookSpec,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::cleaner::CleaningReport;
use crate::config::{FillColors, QualityThresholds, ReportConfig};
use crate::metrics::Metrics;
use crate::narrative::Narrative;
use crate::table::{CellValue, Table};
use crate::types::SourceInfo;
use crate::utils::format_decimal;
use document::build_document;
use workbook::build_workbook;

pub const ROWS_LABEL: &str = "Rows";
pub const COLUMNS_LABEL: &str = "Columns";
pub const DUPLICATE_ROWS_LABEL: &str = "Duplicate Rows Removed";
pub const TOTAL_NULLS_LABEL: &str = "Total Null Values";
pub const QUALITY_SCORE_LABEL: &str = "Data Quality Score (%)";

// =============================================================================
// Summary figures
// =============================================================================

/// A summary figure, typed so each payload can render it natively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryValue {
    Count(usize),
    Percent(f64),
}

impl SummaryValue {
    pub fn to_cell(self) -> CellValue {
        match self {
            SummaryValue::Count(n) => CellValue::from(n as i64),
            SummaryValue::Percent(p) => CellValue::number(p),
        }
    }
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Count(n) => write!(f, "{n}"),
            SummaryValue::Percent(p) => f.write_str(&format_decimal(*p)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: SummaryValue,
}

/// The five summary figures, in display order.
pub fn summary_rows(cleaning: &CleaningReport, metrics: &Metrics) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            label: ROWS_LABEL,
            value: SummaryValue::Count(metrics.row_count),
        },
        SummaryRow {
            label: COLUMNS_LABEL,
            value: SummaryValue::Count(metrics.column_count),
        },
        SummaryRow {
            label: DUPLICATE_ROWS_LABEL,
            value: SummaryValue::Count(cleaning.duplicate_rows_removed),
        },
        SummaryRow {
            label: TOTAL_NULLS_LABEL,
            value: SummaryValue::Count(metrics.total_nulls),
        },
        SummaryRow {
            label: QUALITY_SCORE_LABEL,
            value: SummaryValue::Percent(metrics.quality_score),
        },
    ]
}

// =============================================================================
// Quality tiers
// =============================================================================

/// Fill tier of the quality-score cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Pass,
    Warn,
    Fail,
}

impl QualityTier {
    /// `>= pass` passes, `>= warn` warns, anything lower fails.
    pub fn from_score(score: f64, thresholds: &QualityThresholds) -> Self {
        if score >= thresholds.pass {
            QualityTier::Pass
        } else if score >= thresholds.warn {
            QualityTier::Warn
        } else {
            QualityTier::Fail
        }
    }

    pub fn color(self, colors: &FillColors) -> &str {
        match self {
            QualityTier::Pass => &colors.pass,
            QualityTier::Warn => &colors.warn,
            QualityTier::Fail => &colors.fail,
        }
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Inputs shared by both payloads.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub source: &'a SourceInfo,
    pub table: &'a Table,
    pub cleaning: &'a CleaningReport,
    pub metrics: &'a Metrics,
    pub narrative: &'a Narrative,
}

/// Builds the workbook and document payloads.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    config: ReportConfig,
}

impl ReportAssembler {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn workbook(&self, ctx: &ReportContext<'_>) -> WorkbookSpec {
        build_workbook(ctx, &self.config)
    }

    pub fn document(&self, ctx: &ReportContext<'_>) -> DocumentSpec {
        build_document(ctx, &self.config)
    }

    pub fn assemble(&self, ctx: &ReportContext<'_>) -> (WorkbookSpec, DocumentSpec) {
        let workbook = self.workbook(ctx);
        let document = self.document(ctx);
        info!(
            "Assembled {} ({} sheets, {} charts) and {} ({} blocks)",
            workbook.file_name,
            workbook.sheets.len(),
            workbook.charts.len(),
            document.file_name,
            document.blocks.len()
        );
        (workbook, document)
    }
}
