//! Custom error types for the accelerometer processing pipeline.
//!
//! Every failure that can abort a run maps to one variant of
//! [`ProcessingError`]. Errors carry enough context (file path, stage name)
//! to diagnose a failed run, and serialize to a `{code, message}` pair so
//! they can be embedded in JSON run reports.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::Path;
use thiserror::Error;

/// The main error type for the processing pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Input could not be read or is not valid delimited text.
    #[error("Failed to parse {input}: {reason}")]
    Parse { input: String, reason: String },

    /// A required axis column is absent from the table.
    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Fewer rows survived cleaning than zero-phase filtering needs.
    #[error("Insufficient data: {rows} rows remain after cleaning, filtering needs at least {required}")]
    InsufficientData { rows: usize, required: usize },

    /// Min-max scaling was asked to rescale a zero-range signal.
    #[error("Cannot normalize {0}: observed range is zero")]
    Normalization(String),

    /// Output destination could not be written.
    #[error("Failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

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
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Build a [`ProcessingError::Parse`] for the given path.
    pub fn parse(path: &Path, reason: impl ToString) -> Self {
        ProcessingError::Parse {
            input: format!("'{}'", path.display()),
            reason: reason.to_string(),
        }
    }

    /// Build a [`ProcessingError::Write`] for the given path.
    pub fn write(path: &Path, reason: impl ToString) -> Self {
        ProcessingError::Write {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "PARSE_ERROR",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::Normalization(_) => "NORMALIZATION_ERROR",
            Self::Write { .. } => "WRITE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Return the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &ProcessingError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

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
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}
