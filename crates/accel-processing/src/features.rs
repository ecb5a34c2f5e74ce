//! Derived features computed from the conditioned axes.

use crate::error::Result;
use crate::utils::{column_to_f64, put_f64_column};
use polars::prelude::*;

/// Per-row Euclidean norm of three equal-length columns.
pub fn motion_intensity(x: &[f64], y: &[f64], z: &[f64]) -> Vec<f64> {
    debug_assert!(x.len() == y.len() && y.len() == z.len());
    x.iter()
        .zip(y)
        .zip(z)
        .map(|((&x, &y), &z)| (x * x + y * y + z * z).sqrt())
        .collect()
}

/// Compute the motion intensity of `columns` and append it as `name`.
pub fn append_motion_intensity(df: &mut DataFrame, columns: &[String; 3], name: &str) -> Result<()> {
    let x = column_to_f64(df, &columns[0])?;
    let y = column_to_f64(df, &columns[1])?;
    let z = column_to_f64(df, &columns[2])?;
    put_f64_column(df, name, motion_intensity(&x, &y, &z))
}
