//! Stage tracking and progress reporting for the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use accel_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{}] {}", update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .run("data/in.csv", "data/out.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the conditioning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the input table
    Loading,
    /// Dropping incomplete rows
    Cleaning,
    /// Zero-phase low-pass filtering of each axis
    Filtering,
    /// Min-max scaling of the filtered axes
    Normalizing,
    /// Computing motion intensity
    Deriving,
    /// Writing the output table
    Writing,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Cleaning => "Cleaning",
            Self::Filtering => "Filtering",
            Self::Normalizing => "Normalizing",
            Self::Deriving => "Deriving Features",
            Self::Writing => "Writing",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Whether this stage ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A progress update emitted when a stage starts or ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Complete, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Failed, message)
    }
}

/// Receiver of pipeline progress updates.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Adapter that turns a closure into a [`ProgressReporter`].
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
