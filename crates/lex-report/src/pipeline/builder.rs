//! Main report pipeline.
//!
//! The pipeline owns only immutable configuration and stage objects; every
//! run creates its own table, metrics and payloads and hands them back in a
//! [`PipelineOutput`].

use polars::prelude::DataFrame;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::cleaner::DataCleaner;
use crate::config::ReportConfig;
use crate::error::{Result, ResultExt};
use crate::loader::{RawTable, load_dataframe, load_records};
use crate::metrics::MetricsEngine;
use crate::narrative::NarrativeGenerator;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage,
};
use crate::reporting::{ReportAssembler, ReportContext};
use crate::table::Table;
use crate::types::{PipelineOutput, SourceInfo};

/// The report pipeline: load, clean, measure, narrate, assemble.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::{Pipeline, ReportConfig, SourceInfo};
///
/// let output = Pipeline::builder()
///     .config(ReportConfig::builder().category_column("REGION").build()?)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .process_dataframe(&df, SourceInfo::new("sales.csv"))?;
///
/// println!("quality: {:.2}%", output.metrics.quality_score);
/// ```
pub struct Pipeline {
    config: ReportConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    metrics: MetricsEngine,
    narrator: NarrativeGenerator,
    assembler: ReportAssembler,
}

// One pipeline may serve concurrent invocations from worker threads
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run on header labels plus rows from an upstream parser.
    ///
    /// # Errors
    ///
    /// Fails only when the input cannot be loaded as a table.
    pub fn process(&self, raw: RawTable, source: SourceInfo) -> Result<PipelineOutput> {
        self.run(source, || Ok(load_records(raw)?))
    }

    /// Run on a polars `DataFrame`.
    pub fn process_dataframe(&self, df: &DataFrame, source: SourceInfo) -> Result<PipelineOutput> {
        self.run(source, || Ok(load_dataframe(df)?))
    }

    /// Run on an already loaded table.
    pub fn process_table(&self, table: Table, source: SourceInfo) -> Result<PipelineOutput> {
        self.run(source, || Ok(table))
    }

    fn run(
        &self,
        source: SourceInfo,
        load: impl FnOnce() -> Result<Table>,
    ) -> Result<PipelineOutput> {
        match self.run_internal(source, load) {
            Ok(output) => {
                self.report_progress(ProgressUpdate::complete("Report pipeline completed"));
                Ok(output)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(
        &self,
        source: SourceInfo,
        load: impl FnOnce() -> Result<Table>,
    ) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        info!("Starting report pipeline for '{}'...", source.file_name);

        // Step 1: Load
        self.report_progress(ProgressUpdate::new(ReportStage::Loading, 0.0, "Loading data..."));
        let table = load().context(format!("Reading '{}'", source.file_name))?;
        let original_shape = table.shape();
        info!("Step 1: Loaded table with shape {:?}", original_shape);
        self.report_progress(ProgressUpdate::new(ReportStage::Loading, 1.0, "Data loaded"));

        // Step 2: Clean
        self.report_progress(ProgressUpdate::new(ReportStage::Cleaning, 0.0, "Cleaning data..."));
        info!("Step 2: Cleaning data...");
        let (cleaned, cleaning_report) = self.cleaner.clean(table);
        debug!(
            "Removed {} empty rows, {} duplicate rows, {} columns",
            cleaning_report.empty_rows_removed,
            cleaning_report.duplicate_rows_removed,
            cleaning_report.removed_columns.len()
        );
        self.report_progress(ProgressUpdate::new(ReportStage::Cleaning, 1.0, "Cleaning complete"));

        // Step 3: Metrics
        self.report_progress(ProgressUpdate::new(
            ReportStage::Metrics,
            0.0,
            "Computing metrics...",
        ));
        info!("Step 3: Computing metrics...");
        let metrics = self.metrics.compute(&cleaned);
        self.report_progress(ProgressUpdate::new(ReportStage::Metrics, 1.0, "Metrics computed"));

        // Step 4: Narrative
        self.report_progress(ProgressUpdate::new(
            ReportStage::Narrative,
            0.0,
            "Writing narrative...",
        ));
        info!("Step 4: Writing narrative...");
        let narrative = self.narrator.generate(&source, &cleaning_report, &metrics);
        self.report_progress(ProgressUpdate::new(ReportStage::Narrative, 1.0, "Narrative written"));

        // Step 5: Assembly
        self.report_progress(ProgressUpdate::new(
            ReportStage::Assembly,
            0.0,
            "Assembling workbook and document...",
        ));
        info!("Step 5: Assembling reports...");
        let (workbook, document) = self.assembler.assemble(&ReportContext {
            source: &source,
            table: &cleaned,
            cleaning: &cleaning_report,
            metrics: &metrics,
            narrative: &narrative,
        });
        self.report_progress(ProgressUpdate::new(ReportStage::Assembly, 1.0, "Reports assembled"));

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Report pipeline completed in {}ms", duration_ms);

        Ok(PipelineOutput {
            original_shape,
            cleaned,
            cleaning_report,
            metrics,
            narrative,
            workbook,
            document,
            duration_ms,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<ReportConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Shorthand for [`progress_reporter`](Self::progress_reporter) with a
    /// [`ClosureProgressReporter`].
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`](crate::error::ReportError::InvalidConfig)
    /// when the configuration fails validation.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            cleaner: DataCleaner,
            metrics: MetricsEngine::from_config(&config),
            narrator: NarrativeGenerator::from_config(&config),
            assembler: ReportAssembler::new(config.clone()),
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityThresholds;
    use crate::error::ReportError;
    use crate::table::CellValue;
    use std::sync::Mutex;

    fn raw() -> RawTable {
        RawTable::new(
            [" Name ", "name.1", "Email"],
            vec![
                vec![CellValue::from("Bob"), CellValue::from("Bob"), CellValue::from("BOB@X.COM")],
                vec![CellValue::from("Bob"), CellValue::from("Bob"), CellValue::from("bob@x.com")],
            ],
        )
    }

    #[test]
    fn test_process_end_to_end() {
        let pipeline = Pipeline::builder().build().unwrap();
        let output = pipeline.process(raw(), SourceInfo::new("people.csv")).unwrap();

        assert_eq!(output.original_shape, (2, 3));
        assert_eq!(output.cleaned.columns(), &["NAME", "EMAIL"]);
        assert_eq!(output.cleaning_report.removed_columns, vec!["NAME.1"]);
        assert_eq!(output.cleaning_report.duplicate_rows_removed, 1);
        assert_eq!(output.metrics.quality_score, 100.0);
        assert!(output.workbook.file_name.starts_with("processed_"));
        assert!(output.document.file_name.starts_with("report_"));
    }

    #[test]
    fn test_progress_is_reported_in_order() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        let pipeline = Pipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update))
            .build()
            .unwrap();

        pipeline.process(raw(), SourceInfo::new("people.csv")).unwrap();

        let updates = updates.lock().unwrap();
        let last = updates.last().unwrap();
        assert_eq!(last.stage, ReportStage::Complete);
        assert!(updates.windows(2).all(|w| w[0].progress <= w[1].progress + 1e-6));
    }

    #[test]
    fn test_load_failure_reports_failed() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        let pipeline = Pipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();

        let err = pipeline
            .process(RawTable::default(), SourceInfo::new("empty.csv"))
            .unwrap_err();

        assert_eq!(err.error_code(), "NO_HEADER");
        assert!(err.to_string().starts_with("Reading 'empty.csv'"));
        assert_eq!(updates.lock().unwrap().last(), Some(&ReportStage::Failed));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ReportConfig {
            quality_thresholds: QualityThresholds {
                pass: 40.0,
                warn: 60.0,
            },
            ..ReportConfig::default()
        };
        let result = Pipeline::builder().config(config).build();
        assert!(matches!(result, Err(ReportError::InvalidConfig(_))));
    }
}
