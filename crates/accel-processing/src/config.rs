//! Configuration types for the signal conditioning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! All defaults reproduce the fixed parameters the pipeline was designed
//! around: a 4th-order 5 Hz low-pass on 50 Hz data, joint min-max scaling.

use serde::{Deserialize, Serialize};

/// Default accelerometer axis columns, in X, Y, Z order.
pub const DEFAULT_AXIS_COLUMNS: [&str; 3] = ["Accel_X", "Accel_Y", "Accel_Z"];

/// How min-max scaling is fitted across the filtered axis columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalingPolicy {
    /// One shared min/max across all axes (preserves relative magnitudes)
    #[default]
    Joint,
    /// Independent min/max per axis
    PerAxis,
}

/// Configuration for the conditioning pipeline.
///
/// Use [`ConditioningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use accel_processing::config::{ConditioningConfig, ScalingPolicy};
///
/// let config = ConditioningConfig::builder()
///     .cutoff_hz(3.0)
///     .scaling(ScalingPolicy::PerAxis)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditioningConfig {
    /// Raw axis columns to filter, in X, Y, Z order.
    /// Default: `["Accel_X", "Accel_Y", "Accel_Z"]`
    pub axis_columns: [String; 3],

    /// Suffix appended to each axis name for its filtered column.
    /// Default: "_filtered"
    pub filtered_suffix: String,

    /// Name of the derived intensity column.
    /// Default: "motion_intensity"
    pub intensity_column: String,

    /// Low-pass cutoff frequency in Hz.
    /// Default: 5.0
    pub cutoff_hz: f64,

    /// Sampling rate of the recording in Hz.
    /// Default: 50.0
    pub sample_rate_hz: f64,

    /// Butterworth filter order.
    /// Default: 4
    pub filter_order: usize,

    /// Min-max scaling policy.
    /// Default: Joint
    pub scaling: ScalingPolicy,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            axis_columns: DEFAULT_AXIS_COLUMNS.map(String::from),
            filtered_suffix: "_filtered".to_string(),
            intensity_column: "motion_intensity".to_string(),
            cutoff_hz: 5.0,
            sample_rate_hz: 50.0,
            filter_order: 4,
            scaling: ScalingPolicy::default(),
        }
    }
}

impl ConditioningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ConditioningConfigBuilder {
        ConditioningConfigBuilder::default()
    }

    /// Names of the filtered output columns, in axis order.
    pub fn filtered_columns(&self) -> [String; 3] {
        self.axis_columns
            .clone()
            .map(|axis| format!("{axis}{}", self.filtered_suffix))
    }

    /// Nyquist frequency of the configured sampling rate.
    pub fn nyquist_hz(&self) -> f64 {
        0.5 * self.sample_rate_hz
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(ConfigValidationError::InvalidSampleRate(self.sample_rate_hz));
        }

        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < self.nyquist_hz()) {
            return Err(ConfigValidationError::InvalidCutoff {
                cutoff: self.cutoff_hz,
                nyquist: self.nyquist_hz(),
            });
        }

        if self.filter_order == 0 {
            return Err(ConfigValidationError::InvalidOrder(self.filter_order));
        }

        if self.filtered_suffix.is_empty() {
            return Err(ConfigValidationError::EmptyName("filtered_suffix"));
        }

        if self.intensity_column.is_empty() {
            return Err(ConfigValidationError::EmptyName("intensity_column"));
        }

        let [x, y, z] = &self.axis_columns;
        if x.is_empty() || y.is_empty() || z.is_empty() {
            return Err(ConfigValidationError::EmptyName("axis_columns"));
        }
        if x == y || y == z || x == z {
            return Err(ConfigValidationError::DuplicateAxis);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid sample rate: {0} Hz (must be positive and finite)")]
    InvalidSampleRate(f64),

    #[error("Invalid cutoff: {cutoff} Hz (must be between 0 and the Nyquist frequency {nyquist} Hz)")]
    InvalidCutoff { cutoff: f64, nyquist: f64 },

    #[error("Invalid filter order: {0} (must be at least 1)")]
    InvalidOrder(usize),

    #[error("'{0}' must not be empty")]
    EmptyName(&'static str),

    #[error("Axis columns must be distinct")]
    DuplicateAxis,
}

impl From<ConfigValidationError> for crate::error::ProcessingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ConditioningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ConditioningConfigBuilder {
    axis_columns: Option<[String; 3]>,
    filtered_suffix: Option<String>,
    intensity_column: Option<String>,
    cutoff_hz: Option<f64>,
    sample_rate_hz: Option<f64>,
    filter_order: Option<usize>,
    scaling: Option<ScalingPolicy>,
}

impl ConditioningConfigBuilder {
    /// Set the three raw axis columns (X, Y, Z order).
    pub fn axis_columns(mut self, x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        self.axis_columns = Some([x.into(), y.into(), z.into()]);
        self
    }

    /// Set the suffix used to name filtered columns.
    pub fn filtered_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filtered_suffix = Some(suffix.into());
        self
    }

    /// Set the name of the derived intensity column.
    pub fn intensity_column(mut self, name: impl Into<String>) -> Self {
        self.intensity_column = Some(name.into());
        self
    }

    /// Set the low-pass cutoff frequency in Hz.
    pub fn cutoff_hz(mut self, cutoff: f64) -> Self {
        self.cutoff_hz = Some(cutoff);
        self
    }

    /// Set the sampling rate in Hz.
    pub fn sample_rate_hz(mut self, rate: f64) -> Self {
        self.sample_rate_hz = Some(rate);
        self
    }

    /// Set the Butterworth filter order.
    pub fn filter_order(mut self, order: usize) -> Self {
        self.filter_order = Some(order);
        self
    }

    /// Set the min-max scaling policy.
    pub fn scaling(mut self, policy: ScalingPolicy) -> Self {
        self.scaling = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ConditioningConfig` or an error if validation fails.
    pub fn build(self) -> Result<ConditioningConfig, ConfigValidationError> {
        let defaults = ConditioningConfig::default();
        let config = ConditioningConfig {
            axis_columns: self.axis_columns.unwrap_or(defaults.axis_columns),
            filtered_suffix: self.filtered_suffix.unwrap_or(defaults.filtered_suffix),
            intensity_column: self.intensity_column.unwrap_or(defaults.intensity_column),
            cutoff_hz: self.cutoff_hz.unwrap_or(defaults.cutoff_hz),
            sample_rate_hz: self.sample_rate_hz.unwrap_or(defaults.sample_rate_hz),
            filter_order: self.filter_order.unwrap_or(defaults.filter_order),
            scaling: self.scaling.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
