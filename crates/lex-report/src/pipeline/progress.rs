//! Progress reporting for the report pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_report::Pipeline;
//!
//! let output = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process_table(table, source)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the report pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    /// Turning the input into a table
    Loading,
    /// Header, column and row normalization
    Cleaning,
    /// Quality score, null counts and statistics
    Metrics,
    /// Narrative text
    Narrative,
    /// Workbook and document payloads
    Assembly,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl ReportStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Cleaning Data",
            Self::Metrics => "Computing Metrics",
            Self::Narrative => "Writing Narrative",
            Self::Assembly => "Assembling Reports",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of overall progress taken by this stage; the working stages
    /// sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.10,
            Self::Cleaning => 0.30,
            Self::Metrics => 0.25,
            Self::Narrative => 0.10,
            Self::Assembly => 0.25,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Cleaning => 0.10,
            Self::Metrics => 0.40,
            Self::Narrative => 0.65,
            Self::Assembly => 0.75,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update sent to a [`ProgressReporter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: ReportStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: ReportStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: ReportStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: ReportStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` because one pipeline may serve
/// several worker threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WORKING_STAGES: [ReportStage; 5] = [
        ReportStage::Loading,
        ReportStage::Cleaning,
        ReportStage::Metrics,
        ReportStage::Narrative,
        ReportStage::Assembly,
    ];

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = WORKING_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        let mut expected = 0.0f32;
        for stage in WORKING_STAGES {
            assert!((stage.base_progress() - expected).abs() < 1e-6, "{:?}", stage);
            expected += stage.weight();
        }
    }

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(ReportStage::Metrics, 0.5, "Computing...");
        assert_eq!(update.stage, ReportStage::Metrics);
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.525).abs() < 1e-6);
        assert_eq!(update.message, "Computing...");
    }

    #[test]
    fn test_progress_update_clamps() {
        let update = ProgressUpdate::new(ReportStage::Assembly, 4.0, "");
        assert_eq!(update.progress, 1.0);
        assert_eq!(update.stage_progress, 1.0);
    }

    #[test]
    fn test_terminal_updates() {
        assert_eq!(ProgressUpdate::complete("done").progress, 1.0);
        let failed = ProgressUpdate::failed("boom");
        assert_eq!(failed.stage, ReportStage::Failed);
        assert_eq!(failed.message, "boom");
    }

    #[test]
    fn test_closure_reporter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reporter = ClosureProgressReporter::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::complete("done"));
        reporter.report(ProgressUpdate::complete("done"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
