//! Tabular Data Report Library
//!
//! Cleans a messy tabular dataset and turns it into analytics, a narrative
//! summary and two renderer-agnostic report payloads.
//!
//! # Overview
//!
//! - **Loading**: header labels plus typed rows, or a polars `DataFrame`
//! - **Cleaning**: header normalization, column and row de-duplication, text
//!   standardization
//! - **Metrics**: quality score, null counts, numeric statistics, category
//!   frequency
//! - **Narrative**: deterministic prose built from the metrics
//! - **Report Assembly**: a multi-sheet [`WorkbookSpec`] and a paginated
//!   [`DocumentSpec`] for external renderers
//! - **Progress Reporting**: per-stage progress updates
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_report::{Pipeline, ReportConfig, SourceInfo};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("customers.csv".into()))?
//!     .finish()?;
//!
//! let output = Pipeline::builder()
//!     .config(ReportConfig::builder().category_column("COUNTRY").build()?)
//!     .build()?
//!     .process_dataframe(&df, SourceInfo::new("customers.csv"))?;
//!
//! println!("{}", output.narrative.to_text());
//! println!("Workbook: {}", output.workbook.file_name);
//! println!("Document: {}", output.document.file_name);
//! ```
//!
//! # Stages
//!
//! Each stage is usable on its own:
//!
//! ```rust,ignore
//! use lex_report::*;
//!
//! let table = load_records(RawTable::new(headers, rows))?;
//! let (cleaned, cleaning) = DataCleaner.clean(table);
//! let metrics = MetricsEngine::default().compute(&cleaned);
//! let narrative = NarrativeGenerator::default().generate(&source, &cleaning, &metrics);
//! ```
//!
//! Only loading can fail. Cleaning, metrics, narrative and assembly are total
//! over any table, including one with zero rows.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod narrative;
pub mod pipeline;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use cleaner::{CleaningReport, DataCleaner};
pub use config::{ConfigValidationError, ReportConfig, ReportConfigBuilder};
pub use error::{LoadError, ReportError, Result, ResultExt};
pub use loader::{RawRow, RawTable, load_dataframe, load_records};
pub use metrics::{CategoryCount, Metrics, MetricsEngine, NumericStats};
pub use narrative::{Narrative, NarrativeGenerator};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter, ProgressUpdate,
    ReportStage,
};
pub use reporting::{
    ArtifactNames, DocumentBlock, DocumentSpec, QualityTier, ReportAssembler, ReportContext,
    WorkbookSpec,
};
pub use table::{CellValue, ColumnKind, Table};
pub use types::{PipelineOutput, SourceInfo};
