//! Signal module.
//!
//! Butterworth low-pass design and zero-phase application.

mod butterworth;
mod zero_phase;

pub use butterworth::ButterworthLowPass;
pub use zero_phase::odd_extension;
