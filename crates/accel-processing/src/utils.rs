//! Shared helpers for moving data between polars columns and plain slices.

use crate::error::{ProcessingError, Result, ResultExt};
use polars::prelude::*;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type (can hold NaN).
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check that every named column exists in the DataFrame.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<()> {
    for name in columns {
        let name = name.as_ref();
        if df.column(name).is_err() {
            return Err(ProcessingError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Extract a numeric column as a dense `Vec<f64>`.
///
/// The column must be numeric and free of nulls (i.e. already cleaned).
/// Infinite values are rejected: a single one would turn a whole stretch of
/// filtered output into NaN.
pub fn column_to_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| ProcessingError::MissingColumn(name.to_string()))?;

    if !is_numeric_dtype(column.dtype()) {
        return Err(ProcessingError::Parse {
            input: format!("column '{name}'"),
            reason: format!("column has non-numeric type {}", column.dtype()),
        });
    }

    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(ProcessingError::Parse {
                input: format!("column '{name}'"),
                reason: format!("non-finite value {v} at row {row}"),
            }),
            None => Err(ProcessingError::Parse {
                input: format!("column '{name}'"),
                reason: format!("missing value at row {row}"),
            }),
        })
        .collect()
}

/// Insert (or replace) a Float64 column built from `values`.
pub fn put_f64_column(df: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)
        .context(format!("Writing column '{name}'"))?;
    Ok(())
}
