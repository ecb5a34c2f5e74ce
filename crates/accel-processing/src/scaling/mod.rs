//! Min-max normalization.
//!
//! Fitting is an explicit step that returns a [`FittedScaler`]: the learned
//! `(min, max)` ranges travel with the result and can be applied again to
//! new data. Nothing is cached between calls.

use crate::config::ScalingPolicy;
use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative tolerance under which a range counts as zero.
///
/// Filtering a constant signal leaves rounding noise of a few ULPs, which
/// must not be stretched to fill [0, 1].
pub const RANGE_EPSILON: f64 = 1e-9;

/// Observed value range of one fitted group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// Compute the range of all values across `columns`.
    ///
    /// Returns `None` when there are no values.
    pub fn observe(columns: &[&[f64]]) -> Option<Self> {
        let mut values = columns.iter().flat_map(|c| c.iter().copied());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the range is too narrow to rescale.
    pub fn is_degenerate(&self) -> bool {
        let magnitude = 1.0_f64.max(self.min.abs()).max(self.max.abs());
        !(self.span() > RANGE_EPSILON * magnitude)
    }

    /// Map `value` into [0, 1] relative to this range.
    #[inline]
    pub fn scale(&self, value: f64) -> f64 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Fitted min-max parameters for a set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    pub policy: ScalingPolicy,
    /// One range per column, in the order the columns were fitted.
    /// Under [`ScalingPolicy::Joint`] every entry is identical.
    pub ranges: Vec<FeatureRange>,
}

impl FittedScaler {
    /// Rescale the values of the column at `index` (fit order).
    pub fn transform(&self, index: usize, values: &[f64]) -> Vec<f64> {
        let range = self.ranges[index];
        values.iter().map(|&v| range.scale(v)).collect()
    }

    /// Rescale every column, returning them in the same order.
    pub fn transform_all(&self, columns: &[&[f64]]) -> Vec<Vec<f64>> {
        columns
            .iter()
            .enumerate()
            .map(|(i, values)| self.transform(i, values))
            .collect()
    }
}

/// Stateless min-max scaler.
pub struct MinMaxScaler;

impl MinMaxScaler {
    /// Learn the scaling ranges for `columns` under `policy`.
    ///
    /// `names` are used only in error messages and must match `columns`
    /// one to one.
    ///
    /// # Errors
    ///
    /// Returns `Normalization` when a fitted range is empty or degenerate.
    pub fn fit(columns: &[&[f64]], names: &[&str], policy: ScalingPolicy) -> Result<FittedScaler> {
        debug_assert_eq!(columns.len(), names.len());

        let ranges = match policy {
            ScalingPolicy::Joint => {
                let range = FeatureRange::observe(columns)
                    .filter(|r| !r.is_degenerate())
                    .ok_or_else(|| ProcessingError::Normalization(names.join(", ")))?;
                debug!("Joint range: [{}, {}]", range.min, range.max);
                vec![range; columns.len()]
            }
            ScalingPolicy::PerAxis => columns
                .iter()
                .zip(names)
                .map(|(&values, name)| {
                    let range = FeatureRange::observe(&[values])
                        .filter(|r| !r.is_degenerate())
                        .ok_or_else(|| ProcessingError::Normalization(name.to_string()))?;
                    debug!("Range of '{}': [{}, {}]", name, range.min, range.max);
                    Ok(range)
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(FittedScaler { policy, ranges })
    }

    /// Fit on `columns` and rescale them in one step.
    pub fn fit_transform(
        columns: &[&[f64]],
        names: &[&str],
        policy: ScalingPolicy,
    ) -> Result<(Vec<Vec<f64>>, FittedScaler)> {
        let scaler = Self::fit(columns, names, policy)?;
        let scaled = scaler.transform_all(columns);
        Ok((scaled, scaler))
    }
}
