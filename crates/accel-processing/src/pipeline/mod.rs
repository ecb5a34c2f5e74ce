//! Pipeline module.
//!
//! This module provides the conditioning pipeline, its individual stages,
//! and progress reporting.

mod builder;
pub mod progress;
pub mod stages;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
