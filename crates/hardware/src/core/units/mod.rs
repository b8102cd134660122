//! Functional units of the IMA core.
//!
//! This module groups the latency-bearing execution resources:
//! 1. **[`alu`]:** The shared scalar ALU (add, sub, mul, sigmoid,
//!    shift-and-accumulate), with non-fatal overflow reporting.
//! 2. **[`datapath`]:** The analog compute chain placeholders
//!    (DAC array, crossbar, sample-and-hold, muxes, ADC).

/// Scalar ALU.
pub mod alu;
/// Analog compute chain functional placeholders.
pub mod datapath;

pub use alu::Alu;
pub use datapath::{Adc, Crossbar, DacArray, Mux, SampleHold};
