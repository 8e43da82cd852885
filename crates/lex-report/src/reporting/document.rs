//! Paginated document payload.

use serde::{Deserialize, Serialize};

use super::naming::ArtifactNames;
use super::workbook::{NULL_COUNTS_HEADER, NUMERIC_STATS_HEADER};
use super::{ReportContext, summary_rows};
use crate::config::ReportConfig;
use crate::utils::format_decimal;

/// Placeholder a renderer replaces with the current page number.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Header and footer repeated on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTemplate {
    /// Static attribution line.
    pub header: String,
    /// Contains [`PAGE_PLACEHOLDER`].
    pub footer: String,
}

impl PageTemplate {
    pub fn footer_for_page(&self, page: usize) -> String {
        self.footer.replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// One block of document content, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentBlock {
    Title {
        text: String,
    },
    KeyValue {
        key: String,
        value: String,
    },
    Paragraph {
        text: String,
    },
    Table {
        title: String,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// Declarative description of the report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub file_name: String,
    pub page_template: PageTemplate,
    pub blocks: Vec<DocumentBlock>,
}

impl DocumentSpec {
    /// Table block with the given title.
    pub fn table(&self, title: &str) -> Option<(&[String], &[Vec<String>])> {
        self.blocks.iter().find_map(|block| match block {
            DocumentBlock::Table {
                title: t,
                header,
                rows,
            } if t == title => Some((header.as_slice(), rows.as_slice())),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            DocumentBlock::Paragraph { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

pub const SUMMARY_TABLE: &str = "Summary Metrics";
pub const NULL_COUNTS_TABLE: &str = "Null Counts";
pub const NUMERIC_STATS_TABLE: &str = "Numeric Statistics";

/// Title of the category table for a given label.
pub fn category_table_title(label: &str) -> String {
    format!("{label} Frequency")
}

pub(crate) fn build_document(ctx: &ReportContext<'_>, config: &ReportConfig) -> DocumentSpec {
    let metrics = ctx.metrics;
    let mut blocks = vec![
        DocumentBlock::Title {
            text: config.title.clone(),
        },
        DocumentBlock::KeyValue {
            key: "File Name".to_string(),
            value: ctx.source.file_name.clone(),
        },
        DocumentBlock::KeyValue {
            key: "Generated At".to_string(),
            value: ctx.source.generated_at_display(),
        },
    ];

    blocks.extend(ctx.narrative.lines().map(|line| DocumentBlock::Paragraph {
        text: line.to_string(),
    }));

    blocks.push(table(
        SUMMARY_TABLE,
        &["Metric", "Value"],
        summary_rows(ctx.cleaning, metrics)
            .into_iter()
            .map(|row| vec![row.label.to_string(), row.value.to_string()])
            .collect(),
    ));

    blocks.push(table(
        NULL_COUNTS_TABLE,
        &NULL_COUNTS_HEADER,
        metrics
            .null_counts
            .iter()
            .map(|(column, count)| vec![column.clone(), count.to_string()])
            .collect(),
    ));

    if !metrics.numeric_stats.is_empty() {
        blocks.push(table(
            NUMERIC_STATS_TABLE,
            &NUMERIC_STATS_HEADER,
            metrics
                .numeric_stats
                .iter()
                .map(|(column, stats)| {
                    vec![
                        column.clone(),
                        stats.count.to_string(),
                        format_decimal(stats.mean),
                        format_decimal(stats.median),
                        stats
                            .std_dev
                            .map(format_decimal)
                            .unwrap_or_else(|| "N/A".to_string()),
                        format_decimal(stats.min),
                        format_decimal(stats.max),
                    ]
                })
                .collect(),
        ));
    }

    if !metrics.category_frequency.is_empty() {
        blocks.push(DocumentBlock::Table {
            title: category_table_title(&config.category_label),
            header: vec![config.category_label.clone(), "Count".to_string()],
            rows: metrics
                .category_frequency
                .iter()
                .map(|entry| vec![entry.label.clone(), entry.count.to_string()])
                .collect(),
        });
    }

    DocumentSpec {
        file_name: ArtifactNames::for_source(ctx.source).document,
        page_template: PageTemplate {
            header: config.attribution.clone(),
            footer: format!("Page {PAGE_PLACEHOLDER}"),
        },
        blocks,
    }
}

fn table(title: &str, header: &[&str], rows: Vec<Vec<String>>) -> DocumentBlock {
    DocumentBlock::Table {
        title: title.to_string(),
        header: header.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}
