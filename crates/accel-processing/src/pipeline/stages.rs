//! The pipeline stages as plain functions.
//!
//! Each stage takes ownership of the table and hands back a new one, so the
//! stages can be composed, tested, or re-run individually.

use crate::cleaner::{CleaningReport, DataCleaner};
use crate::config::ConditioningConfig;
use crate::error::{ProcessingError, Result};
use crate::features::append_motion_intensity;
use crate::scaling::{FittedScaler, MinMaxScaler};
use crate::signal::ButterworthLowPass;
use crate::utils::{column_to_f64, put_f64_column, require_columns};
use polars::prelude::*;
use tracing::{debug, info};

/// Drop rows with any missing value.
pub fn clean(df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
    DataCleaner::drop_incomplete_rows(df)
}

/// Low-pass filter each axis column into its `*_filtered` column.
///
/// # Errors
///
/// * `MissingColumn` if an axis column is absent.
/// * `Parse` if an axis column is not numeric.
/// * `InsufficientData` if the table is shorter than the filter needs.
pub fn filter_axes(
    mut df: DataFrame,
    config: &ConditioningConfig,
    filter: &ButterworthLowPass,
) -> Result<DataFrame> {
    require_columns(&df, &config.axis_columns)?;

    let required = filter.min_signal_len();
    if df.height() < required {
        return Err(ProcessingError::InsufficientData {
            rows: df.height(),
            required,
        });
    }

    for (axis, target) in config.axis_columns.iter().zip(config.filtered_columns()) {
        let raw = column_to_f64(&df, axis)?;
        let filtered = filter.filtfilt(&raw)?;
        debug!("Filtered '{}' -> '{}' ({} samples)", axis, target, filtered.len());
        put_f64_column(&mut df, &target, filtered)?;
    }

    info!(
        "Applied order-{} low-pass at {} Hz (fs = {} Hz) to {} rows",
        filter.order(),
        filter.cutoff_hz(),
        filter.sample_rate_hz(),
        df.height()
    );

    Ok(df)
}

/// Rescale the filtered columns into [0, 1] in place.
///
/// Returns the fitted scaler so the same ranges can be reapplied later.
pub fn normalize(mut df: DataFrame, config: &ConditioningConfig) -> Result<(DataFrame, FittedScaler)> {
    let names = config.filtered_columns();
    let columns = names
        .iter()
        .map(|name| column_to_f64(&df, name))
        .collect::<Result<Vec<_>>>()?;

    let slices: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (scaled, scaler) = MinMaxScaler::fit_transform(&slices, &name_refs, config.scaling)?;

    for (name, values) in names.iter().zip(scaled) {
        put_f64_column(&mut df, name, values)?;
    }

    info!("Scaled {} filtered columns ({:?} policy)", names.len(), config.scaling);
    Ok((df, scaler))
}

/// Filter then normalize the axis columns.
pub fn condition(df: DataFrame, config: &ConditioningConfig) -> Result<(DataFrame, FittedScaler)> {
    let filter = ButterworthLowPass::from_config(config)?;
    let df = filter_axes(df, config, &filter)?;
    normalize(df, config)
}

/// Append the motion intensity column computed from the scaled axes.
pub fn derive(mut df: DataFrame, config: &ConditioningConfig) -> Result<DataFrame> {
    append_motion_intensity(&mut df, &config.filtered_columns(), &config.intensity_column)?;
    debug!("Appended '{}'", config.intensity_column);
    Ok(df)
}
