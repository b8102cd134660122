//! Analog compute chain functional placeholders.
//!
//! This module models one lane of the crossbar datapath: DAC array,
//! crossbar, sample-and-hold, two mux stages, and ADC. Each unit exposes:
//! 1. **`propagate`:** The data transform. These are explicitly functional
//!    placeholders: every stage is a latency-bearing pass-through, not a
//!    device-physics model.
//! 2. **`latency`:** The configured cycle cost, consumed by the analytic MVM
//!    latency formula rather than simulated unit by unit.
//!
//! Vector stages (DAC, crossbar, sample-and-hold) carry one value per
//! crossbar row; scalar stages (mux, ADC) route one lane at a time.

use crate::common::Word;

/// DAC array converting one digital bit-slice per crossbar row.
#[derive(Debug)]
pub struct DacArray {
    resolution: u32,
    latency: u64,
}

impl DacArray {
    /// Creates a DAC array of the given resolution.
    pub const fn new(resolution: u32, latency: u64) -> Self {
        Self { resolution, latency }
    }

    /// Conversion latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Bits converted per pass.
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Converts a digital slice vector to its "analog" representation.
    pub fn propagate(&self, input: &[Word]) -> Vec<Word> {
        input.to_vec()
    }
}

/// Resistive crossbar performing the analog dot product.
#[derive(Debug)]
pub struct Crossbar {
    size: usize,
    latency: u64,
}

impl Crossbar {
    /// Creates a crossbar of `size` rows/columns.
    pub const fn new(size: usize, latency: u64) -> Self {
        Self { size, latency }
    }

    /// Evaluation latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Rows/columns of the array.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Evaluates the array against the streamed input vector.
    pub fn propagate(&self, input: &[Word]) -> Vec<Word> {
        input.to_vec()
    }
}

/// Sample-and-hold stage keeping the crossbar output stable for conversion.
#[derive(Debug)]
pub struct SampleHold {
    latency: u64,
}

impl SampleHold {
    /// Creates a sample-and-hold bank.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }

    /// Hold latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Samples the lane vector.
    pub fn propagate(&self, input: &[Word]) -> Vec<Word> {
        input.to_vec()
    }
}

/// Mux routing crossbar lanes toward an ADC.
///
/// A mux with fan-in 1 is a wire; the first stage has `xbar_size` inputs per
/// crossbar, the second `num_xbar / num_adc` inputs per ADC.
#[derive(Debug)]
pub struct Mux {
    fan_in: usize,
    latency: u64,
}

impl Mux {
    /// Creates a mux with the given fan-in.
    pub const fn new(fan_in: usize, latency: u64) -> Self {
        Self { fan_in, latency }
    }

    /// Routing latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Input count of the selector.
    pub const fn fan_in(&self) -> usize {
        self.fan_in
    }

    /// Routes the selected lane through.
    pub const fn propagate(&self, input: Word) -> Word {
        input
    }
}

/// ADC converting one held lane value back to digital.
#[derive(Debug)]
pub struct Adc {
    resolution: u32,
    latency: u64,
}

impl Adc {
    /// Creates an ADC of the given resolution.
    pub const fn new(resolution: u32, latency: u64) -> Self {
        Self { resolution, latency }
    }

    /// Conversion latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Bits produced per conversion.
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Converts one lane value to digital.
    pub const fn propagate(&self, input: Word) -> Word {
        input
    }
}
