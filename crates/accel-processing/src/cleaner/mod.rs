//! Row cleaning.
//!
//! A row is kept only when every column holds a value. Float NaN counts as
//! missing, the same as null. Nothing is imputed and row order is kept.

use crate::error::Result;
use crate::utils::is_float_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What the cleaner removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_dropped: usize,
    /// Missing values per column, only for columns that had any.
    pub missing_per_column: BTreeMap<String, usize>,
}

/// Data cleaner for dropping incomplete rows.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop every row that has a missing value in any column.
    ///
    /// An empty result is returned as-is; deciding whether enough rows
    /// remain is up to later stages.
    pub fn drop_incomplete_rows(df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        let rows_before = df.height();
        let mut keep = vec![true; rows_before];
        let mut missing_per_column = BTreeMap::new();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let mut missing = 0usize;

            for (row, is_null) in series.is_null().into_iter().enumerate() {
                if is_null.unwrap_or(false) {
                    keep[row] = false;
                    missing += 1;
                }
            }

            if is_float_dtype(series.dtype()) {
                let floats = series.cast(&DataType::Float64)?;
                for (row, value) in floats.f64()?.into_iter().enumerate() {
                    if let Some(v) = value
                        && v.is_nan()
                    {
                        keep[row] = false;
                        missing += 1;
                    }
                }
            }

            if missing > 0 {
                debug!("Column '{}': {} missing values", series.name(), missing);
                missing_per_column.insert(series.name().to_string(), missing);
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let df = df.filter(&mask)?;
        let rows_after = df.height();
        let rows_dropped = rows_before - rows_after;

        if rows_dropped > 0 {
            warn!(
                "Dropped {} of {} rows with missing values",
                rows_dropped, rows_before
            );
        } else {
            info!("No rows with missing values found");
        }

        Ok((
            df,
            CleaningReport {
                rows_before,
                rows_after,
                rows_dropped,
                missing_per_column,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drops_rows_with_any_null() {
        let df = df![
            "Accel_X" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            "Accel_Y" => [Some(1.0), None, Some(3.0), Some(4.0)],
            "label" => [Some("walk"), Some("walk"), None, Some("run")],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::drop_incomplete_rows(df).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(cleaned.width(), 3);
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(report.missing_per_column.get("Accel_Y"), Some(&1));
        assert_eq!(report.missing_per_column.get("label"), Some(&1));

        // Order is preserved.
        let x: Vec<f64> = cleaned
            .column("Accel_X")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(x, vec![1.0, 4.0]);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df![
            "Accel_X" => [1.0, f64::NAN, 3.0],
            "Accel_Z" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::drop_incomplete_rows(df).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.missing_per_column.get("Accel_X"), Some(&1));
    }

    #[test]
    fn test_complete_table_untouched() {
        let df = df!["a" => [1i64, 2, 3], "b" => ["x", "y", "z"]].unwrap();
        let (cleaned, report) = DataCleaner::drop_incomplete_rows(df.clone()).unwrap();
        assert!(cleaned.equals(&df));
        assert_eq!(report.rows_dropped, 0);
        assert!(report.missing_per_column.is_empty());
    }

    #[test]
    fn test_all_rows_incomplete_yields_empty_table() {
        let df = df![
            "a" => [None::<f64>, Some(1.0)],
            "b" => [Some(1.0), None::<f64>],
        ]
        .unwrap();
        let (cleaned, report) = DataCleaner::drop_incomplete_rows(df).unwrap();
        assert_eq!(cleaned.height(), 0);
        assert_eq!(cleaned.width(), 2);
        assert_eq!(report.rows_after, 0);
    }
}
