//! Main pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! running the conditioning stages in order:
//! load → clean → filter → normalize → derive → write.

use crate::config::ConditioningConfig;
use crate::error::{Result, ResultExt};
use crate::io::{load_csv, write_csv};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::stages;
use crate::signal::ButterworthLowPass;
use crate::types::{FilterSummary, PipelineResult, ProcessingSummary};
use chrono::{SecondsFormat, Utc};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The accelerometer conditioning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use accel_processing::{ConditioningConfig, Pipeline, ScalingPolicy};
///
/// // File to file with the default parameters
/// let result = Pipeline::builder()
///     .build()?
///     .run("data/all_activity_data.csv", "data/processed_all_activity_data.csv")?;
///
/// // In memory, per-axis scaling
/// let result = Pipeline::builder()
///     .config(ConditioningConfig::builder().scaling(ScalingPolicy::PerAxis).build()?)
///     .build()?
///     .process(dataframe)?;
/// ```
pub struct Pipeline {
    config: ConditioningConfig,
    filter: ButterworthLowPass,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &ConditioningConfig {
        &self.config
    }

    /// Run every stage from `input` to `output`.
    ///
    /// Nothing is written unless all stages succeed.
    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<PipelineResult> {
        let input = input.as_ref();
        let output = output.as_ref();

        let outcome = self.run_internal(input, output);
        self.finish(outcome)
    }

    /// Run the in-memory stages (clean, filter, normalize, derive) on `df`.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        let outcome = self.process_internal(df, Instant::now());
        self.finish(outcome)
    }

    fn finish(&self, outcome: Result<PipelineResult>) -> Result<PipelineResult> {
        match outcome {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Pipeline completed: {} rows in {}ms",
                    result.summary.rows_written, result.summary.duration_ms
                )));
                Ok(result)
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

    fn enter(&self, stage: PipelineStage, message: impl Into<String>) {
        let message = message.into();
        info!("{}: {}", stage.display_name(), message);
        self.report_progress(ProgressUpdate::new(stage, message));
    }

    fn run_internal(&self, input: &Path, output: &Path) -> Result<PipelineResult> {
        let start = Instant::now();

        self.enter(PipelineStage::Loading, format!("Reading {}", input.display()));
        let df = load_csv(input).context(PipelineStage::Loading.display_name())?;

        let mut result = self
            .process_internal(df, start)
            .context(format!("Processing {}", input.display()))?;

        self.enter(PipelineStage::Writing, format!("Writing {}", output.display()));
        write_csv(&mut result.data, output).context(PipelineStage::Writing.display_name())?;

        result.summary.input_file = Some(input.display().to_string());
        result.summary.output_file = Some(output.display().to_string());
        result.summary.duration_ms = start.elapsed().as_millis() as u64;

        Ok(result)
    }

    fn process_internal(&self, df: DataFrame, start: Instant) -> Result<PipelineResult> {
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.enter(
            PipelineStage::Cleaning,
            format!("Checking {} rows for missing values", df.height()),
        );
        let (df, cleaning) = stages::clean(df).context(PipelineStage::Cleaning.display_name())?;

        self.enter(
            PipelineStage::Filtering,
            format!(
                "Low-pass {} Hz, order {}, on {} rows",
                self.config.cutoff_hz,
                self.config.filter_order,
                df.height()
            ),
        );
        let df = stages::filter_axes(df, &self.config, &self.filter)
            .context(PipelineStage::Filtering.display_name())?;

        self.enter(PipelineStage::Normalizing, "Fitting min-max ranges");
        let (df, scaler) = stages::normalize(df, &self.config)
            .context(PipelineStage::Normalizing.display_name())?;

        self.enter(
            PipelineStage::Deriving,
            format!("Computing '{}'", self.config.intensity_column),
        );
        let df = stages::derive(df, &self.config).context(PipelineStage::Deriving.display_name())?;

        let output_columns = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let summary = ProcessingSummary {
            input_file: None,
            output_file: None,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            cleaning,
            filter: FilterSummary::from(&self.filter),
            scaling_policy: self.config.scaling,
            scaler,
            output_columns,
            rows_written: df.height(),
        };

        Ok(PipelineResult { data: df, summary })
    }
}

/// Builder for [`Pipeline`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::builder()
///     .config(ConditioningConfig::default())
///     .on_progress(|update| {
///         println!("[{}] {}", update.stage, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<ConditioningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: ConditioningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure to receive progress updates.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Validate the configuration, design the filter, and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let filter = ButterworthLowPass::from_config(&config)?;

        Ok(Pipeline {
            config,
            filter,
            progress_reporter: self.progress_reporter,
        })
    }
}
