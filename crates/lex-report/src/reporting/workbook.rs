//! Workbook payload: sheets, charts, conditional fills and the null heatmap.

use serde::{Deserialize, Serialize};

use super::naming::{ArtifactNames, cell_ref, column_range};
use super::{QUALITY_SCORE_LABEL, QualityTier, ReportContext, summary_rows};
use crate::config::ReportConfig;
use crate::table::CellValue;

pub const DATA_SHEET: &str = "DATA";
pub const SUMMARY_SHEET: &str = "SUMMARY";
pub const NUMERIC_STATS_SHEET: &str = "NUMERIC_STATS";
pub const NULL_COUNTS_SHEET: &str = "NULL_COUNTS";
pub const CATEGORY_FREQ_SHEET: &str = "CATEGORY_FREQ";

pub const NUMERIC_STATS_HEADER: [&str; 7] =
    ["Column", "Count", "Mean", "Median", "Std Dev", "Min", "Max"];
pub const NULL_COUNTS_HEADER: [&str; 2] = ["Column", "Null Count"];

/// A sheet with a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetSpec {
    fn new(name: &str, header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.to_string(),
            header,
            rows,
        }
    }

    /// Value at zero-based sheet coordinates; row 0 is the header.
    pub fn value_at(&self, row: usize, column: usize) -> Option<CellValue> {
        if row == 0 {
            return self.header.get(column).map(|h| CellValue::text(h.as_str()));
        }
        self.rows.get(row - 1)?.get(column).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
}

/// A chart over two ranges of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Sheet the chart is placed on.
    pub sheet: String,
    /// Top-left cell of the chart.
    pub anchor: String,
    /// Range holding the axis labels.
    pub categories: String,
    /// Range holding the bar values.
    pub values: String,
}

/// Fixed background fill for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFill {
    pub sheet: String,
    pub cell: String,
    pub tier: QualityTier,
    pub color: String,
}

/// Zero-based sheet coordinates (row 0 is the header row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

impl CellPosition {
    pub fn to_a1(self) -> String {
        cell_ref(self.row, self.column)
    }
}

/// Null cells of the DATA sheet to be highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSpec {
    pub sheet: String,
    pub color: String,
    pub cells: Vec<CellPosition>,
}

/// Declarative description of the processed workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookSpec {
    pub file_name: String,
    pub sheets: Vec<SheetSpec>,
    pub charts: Vec<ChartSpec>,
    pub conditional_fills: Vec<ConditionalFill>,
    pub heatmap: Option<HeatmapSpec>,
}

impl WorkbookSpec {
    pub fn sheet(&self, name: &str) -> Option<&SheetSpec> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

pub(crate) fn build_workbook(ctx: &ReportContext<'_>, config: &ReportConfig) -> WorkbookSpec {
    let metrics = ctx.metrics;
    let mut sheets = Vec::with_capacity(5);
    let mut charts = Vec::new();

    // DATA
    let data = SheetSpec::new(
        DATA_SHEET,
        ctx.table.columns().to_vec(),
        ctx.table.rows().to_vec(),
    );

    // SUMMARY
    let summary = summary_rows(ctx.cleaning, metrics);
    let score_row = summary
        .iter()
        .position(|row| row.label == QUALITY_SCORE_LABEL)
        .unwrap_or(summary.len().saturating_sub(1));
    let tier = QualityTier::from_score(metrics.quality_score, &config.quality_thresholds);
    let conditional_fills = vec![ConditionalFill {
        sheet: SUMMARY_SHEET.to_string(),
        cell: cell_ref(score_row + 1, 1),
        tier,
        color: tier.color(&config.fill_colors).to_string(),
    }];
    let summary = SheetSpec::new(
        SUMMARY_SHEET,
        vec!["Metric".to_string(), "Value".to_string()],
        summary
            .iter()
            .map(|row| vec![CellValue::text(row.label), row.value.to_cell()])
            .collect(),
    );

    // NUMERIC_STATS
    let numeric = SheetSpec::new(
        NUMERIC_STATS_SHEET,
        header(&NUMERIC_STATS_HEADER),
        metrics
            .numeric_stats
            .iter()
            .map(|(column, stats)| {
                vec![
                    CellValue::text(column.as_str()),
                    CellValue::from(stats.count as i64),
                    CellValue::number(stats.mean),
                    CellValue::number(stats.median),
                    stats.std_dev.map(CellValue::number).unwrap_or_default(),
                    CellValue::number(stats.min),
                    CellValue::number(stats.max),
                ]
            })
            .collect(),
    );
    if config.include_charts && !numeric.rows.is_empty() {
        let last = numeric.rows.len();
        charts.push(ChartSpec {
            kind: ChartKind::Bar,
            title: "Mean by Column".to_string(),
            sheet: NUMERIC_STATS_SHEET.to_string(),
            anchor: cell_ref(1, NUMERIC_STATS_HEADER.len() + 1),
            categories: column_range(NUMERIC_STATS_SHEET, 0, 1, last),
            values: column_range(NUMERIC_STATS_SHEET, 2, 1, last),
        });
    }

    // NULL_COUNTS
    let nulls = SheetSpec::new(
        NULL_COUNTS_SHEET,
        header(&NULL_COUNTS_HEADER),
        metrics
            .null_counts
            .iter()
            .map(|(column, count)| {
                vec![CellValue::text(column.as_str()), CellValue::from(*count as i64)]
            })
            .collect(),
    );

    sheets.extend([data, summary, numeric, nulls]);

    // CATEGORY_FREQ
    if !metrics.category_frequency.is_empty() {
        let frequency = SheetSpec::new(
            CATEGORY_FREQ_SHEET,
            vec![config.category_label.clone(), "Count".to_string()],
            metrics
                .category_frequency
                .iter()
                .map(|entry| {
                    vec![
                        CellValue::text(entry.label.as_str()),
                        CellValue::from(entry.count as i64),
                    ]
                })
                .collect(),
        );
        if config.include_charts {
            let last = frequency.rows.len();
            charts.push(ChartSpec {
                kind: ChartKind::Bar,
                title: format!("{} Distribution", config.category_label),
                sheet: CATEGORY_FREQ_SHEET.to_string(),
                anchor: cell_ref(1, 3),
                categories: column_range(CATEGORY_FREQ_SHEET, 0, 1, last),
                values: column_range(CATEGORY_FREQ_SHEET, 1, 1, last),
            });
        }
        sheets.push(frequency);
    }

    let heatmap = config.include_null_heatmap.then(|| HeatmapSpec {
        sheet: DATA_SHEET.to_string(),
        color: config.heatmap_color.clone(),
        cells: null_cells(ctx.table.rows()),
    });

    WorkbookSpec {
        file_name: ArtifactNames::for_source(ctx.source).workbook,
        sheets,
        charts,
        conditional_fills,
        heatmap,
    }
}

fn header(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

/// Positions of null cells, offset by one row for the header.
fn null_cells(rows: &[Vec<CellValue>]) -> Vec<CellPosition> {
    rows.iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_null())
                .map(move |(column, _)| CellPosition { row: r + 1, column })
        })
        .collect()
}
