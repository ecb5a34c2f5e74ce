//! Accelerometer Signal Conditioning Library
//!
//! Turns raw multi-axis accelerometer recordings into smoothed, normalized
//! signals and a scalar motion-intensity feature, built with Rust and Polars.
//!
//! # Overview
//!
//! A run is a single linear batch pipeline:
//!
//! - **Loading**: Read a comma-separated table with a header row
//! - **Cleaning**: Drop every row with a missing value in any column
//! - **Filtering**: Zero-phase Butterworth low-pass on `Accel_X/Y/Z`
//!   (order 4, 5 Hz cutoff, 50 Hz sampling by default)
//! - **Normalizing**: Min-max scale the filtered axes into [0, 1]
//! - **Deriving**: `motion_intensity = sqrt(x² + y² + z²)` per row
//! - **Writing**: Write the full table, all at once or not at all
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use accel_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .build()?
//!     .run("data/all_activity_data.csv", "data/processed_all_activity_data.csv")?;
//!
//! println!("Wrote {} rows", result.summary.rows_written);
//! ```
//!
//! # Running stages individually
//!
//! Every stage is a plain function over a `DataFrame`, see
//! [`pipeline::stages`]:
//!
//! ```rust,ignore
//! use accel_processing::{ConditioningConfig, io, pipeline::stages};
//!
//! let config = ConditioningConfig::default();
//! let df = io::load_csv("data/all_activity_data.csv".as_ref())?;
//! let (df, _report) = stages::clean(df)?;
//! let (df, scaler) = stages::condition(df, &config)?;
//! let mut df = stages::derive(df, &config)?;
//! io::write_csv(&mut df, "out.csv".as_ref())?;
//! ```
//!
//! # Errors
//!
//! Failures surface as [`ProcessingError`]; no output file is produced on
//! failure.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod pipeline;
pub mod scaling;
pub mod signal;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CleaningReport, DataCleaner};
pub use config::{ConditioningConfig, ConditioningConfigBuilder, ConfigValidationError, ScalingPolicy};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use features::motion_intensity;
pub use io::{TableOverview, describe_table, load_csv, write_csv};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use scaling::{FeatureRange, FittedScaler, MinMaxScaler};
pub use signal::ButterworthLowPass;
pub use types::{FilterSummary, PipelineResult, ProcessingSummary};
