//! Custom error types for the report pipeline.
//!
//! Loading is the only stage that can reject its input; cleaning, metrics,
//! narrative and assembly are total over any well-formed [`Table`](crate::Table).
//! Everything else in here wraps the ambient failures of the collaborators
//! around the core (polars, file IO, JSON output).
//!
//! Errors are serializable so a transport layer can hand them to a client
//! as `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Raised when collaborator-supplied input cannot be interpreted as a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The input has no header row at all.
    #[error("Input has no header row")]
    NoHeader,

    /// A header row exists but it names zero columns.
    #[error("Input has zero columns")]
    NoColumns,

    /// A positional row carries more cells than there are headers.
    #[error("Row {row} has {found} cells but the header defines {expected} columns")]
    RowTooWide {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The upstream frame could not be converted cell by cell.
    #[error("Column '{column}' could not be read: {reason}")]
    UnreadableColumn { column: String, reason: String },
}

/// The main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Input could not be loaded as a table.
    #[error("Failed to load input: {0}")]
    Load(#[from] LoadError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for client-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(LoadError::NoHeader) => "NO_HEADER",
            Self::Load(LoadError::NoColumns) => "NO_COLUMNS",
            Self::Load(LoadError::RowTooWide { .. }) => "ROW_TOO_WIDE",
            Self::Load(LoadError::UnreadableColumn { .. }) => "UNREADABLE_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by unusable input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Load(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ReportError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, LoadError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Load(e).with_context(context))
    }
}
