//! Digital Butterworth low-pass design and IIR filtering.
//!
//! The analog prototype is built from conjugate pole pairs, prewarped, and
//! mapped through the bilinear transform one second-order section at a
//! time. Sections are multiplied out into a single transfer function
//! `(b, a)` with `a[0] == 1`, which is then run in direct form II
//! transposed.

use crate::config::ConditioningConfig;
use crate::error::{ProcessingError, Result};
use serde::Serialize;
use std::f64::consts::PI;

/// A designed Butterworth low-pass filter.
#[derive(Debug, Clone, Serialize)]
pub struct ButterworthLowPass {
    order: usize,
    cutoff_hz: f64,
    sample_rate_hz: f64,
    b: Vec<f64>,
    a: Vec<f64>,
}

impl ButterworthLowPass {
    /// Design a low-pass filter of the given order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `order` is zero, the sampling rate is not
    /// positive, or the cutoff is not strictly between 0 and Nyquist.
    pub fn design(order: usize, cutoff_hz: f64, sample_rate_hz: f64) -> Result<Self> {
        if order == 0 {
            return Err(ProcessingError::InvalidConfig(
                "filter order must be at least 1".to_string(),
            ));
        }
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(ProcessingError::InvalidConfig(format!(
                "sample rate must be positive, got {sample_rate_hz}"
            )));
        }
        let nyquist = 0.5 * sample_rate_hz;
        if !(cutoff_hz > 0.0 && cutoff_hz < nyquist) {
            return Err(ProcessingError::InvalidConfig(format!(
                "cutoff {cutoff_hz} Hz must lie strictly between 0 and Nyquist ({nyquist} Hz)"
            )));
        }

        // Normalized cutoff in half-cycles/sample, designed at fs = 2.
        let wn = cutoff_hz / nyquist;
        let k = 4.0;
        let warped = k * (PI * wn / 2.0).tan();

        let mut b = vec![1.0];
        let mut a = vec![1.0];

        // Conjugate pole pairs sit at angles pi*m/(2N), m = N-1, N-3, ... > 0.
        let n = order as f64;
        let mut m = order as isize - 1;
        while m > 0 {
            let theta = PI * m as f64 / (2.0 * n);
            let c1 = 2.0 * warped * theta.cos();
            let c0 = warped * warped;

            let a0 = k * k + c1 * k + c0;
            let den = [1.0, (2.0 * c0 - 2.0 * k * k) / a0, (k * k - c1 * k + c0) / a0];
            let num = [c0 / a0, 2.0 * c0 / a0, c0 / a0];

            b = poly_mul(&b, &num);
            a = poly_mul(&a, &den);
            m -= 2;
        }

        // Odd orders carry one real pole at -warped.
        if order % 2 == 1 {
            let a0 = k + warped;
            b = poly_mul(&b, &[warped / a0, warped / a0]);
            a = poly_mul(&a, &[1.0, (warped - k) / a0]);
        }

        Ok(Self {
            order,
            cutoff_hz,
            sample_rate_hz,
            b,
            a,
        })
    }

    /// Design the filter described by a pipeline configuration.
    pub fn from_config(config: &ConditioningConfig) -> Result<Self> {
        Self::design(config.filter_order, config.cutoff_hz, config.sample_rate_hz)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Numerator coefficients.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients, normalized so `a[0] == 1`.
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Gain at DC, `sum(b) / sum(a)`.
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Initial filter state for a unit-step input in steady state.
    ///
    /// Scaling this by the first sample of a signal suppresses the start-up
    /// transient of [`filter_with_state`](Self::filter_with_state).
    pub fn steady_state(&self) -> Vec<f64> {
        let gain = self.dc_gain();
        let n = self.a.len() - 1;
        let mut zi = vec![0.0; n];
        let mut acc = 0.0;
        for i in (1..=n).rev() {
            acc += self.b[i] - self.a[i] * gain;
            zi[i - 1] = acc;
        }
        zi
    }

    /// Run the filter over `signal` in direct form II transposed.
    ///
    /// `state` supplies the initial delay-line contents and must have
    /// `order` entries.
    pub fn filter_with_state(&self, signal: &[f64], state: &[f64]) -> Vec<f64> {
        debug_assert_eq!(state.len(), self.order);
        let n = self.order;
        let mut z = state.to_vec();
        let mut out = Vec::with_capacity(signal.len());

        for &x in signal {
            let y = self.b[0] * x + z[0];
            for i in 0..n - 1 {
                z[i] = self.b[i + 1] * x + z[i + 1] - self.a[i + 1] * y;
            }
            z[n - 1] = self.b[n] * x - self.a[n] * y;
            out.push(y);
        }

        out
    }

    /// Run the filter from rest (zero initial state).
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        self.filter_with_state(signal, &vec![0.0; self.order])
    }
}

fn poly_mul(p: &[f64], q: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; p.len() + q.len() - 1];
    for (i, &pi) in p.iter().enumerate() {
        for (j, &qj) in q.iter().enumerate() {
            out[i + j] += pi * qj;
        }
    }
    out
}
