//! Configuration system for the IMA core simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! simulated hardware. It provides:
//! 1. **Defaults:** Baseline hardware constants (crossbar geometry, converter
//!    resolution, per-unit latencies, memory sizes).
//! 2. **Structures:** Hierarchical config for general, geometry, datapath,
//!    memory, and data-format parameters.
//! 3. **Validation:** A construction-time pass rejecting inconsistent
//!    parameter combinations.
//!
//! Configuration is supplied via JSON (`serde_json`) or `Config::default()`.

use serde::Deserialize;

use crate::common::SimError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration file.
mod defaults {
    /// Number of crossbars in the core.
    pub const NUM_XBAR: usize = 6;

    /// Rows/columns per crossbar (also the lane count of a crossbar pass).
    pub const XBAR_SIZE: usize = 4;

    /// DAC resolution in bits.
    ///
    /// Each MVM pass streams one `DAC_RES`-bit slice of the operand width
    /// through the analog chain.
    pub const DAC_RES: u32 = 2;

    /// ADC resolution in bits.
    pub const ADC_RES: u32 = 2;

    /// Number of ADCs shared between crossbars.
    ///
    /// Lane outputs route to an ADC through a `NUM_XBAR / NUM_ADC` fan-in
    /// second mux stage.
    pub const NUM_ADC: usize = 6;

    /// Number of scalar ALUs (the shared shift-and-accumulate unit).
    pub const NUM_ALU: usize = 1;

    /// Scalar data memory capacity in words.
    pub const DATA_MEM_SIZE: usize = 16;

    /// Instruction memory capacity in instructions.
    pub const INSTRN_MEM_SIZE: usize = 80;

    /// Architectural data width in bits (two's-complement words).
    pub const DATA_WIDTH: u32 = 8;

    /// Crossbar operand width in bits (streamed bit-serially over the DAC).
    pub const XBDATA_WIDTH: u32 = 8;

    /// Fractional bits of the fixed-point format used by the sigmoid unit.
    pub const FRAC_BITS: u32 = 4;

    /// Crossbar analog evaluation latency in cycles.
    pub const XBAR_LAT: u64 = 17;

    /// DAC conversion latency in cycles.
    pub const DAC_LAT: u64 = 1;

    /// ADC conversion latency in cycles.
    pub const ADC_LAT: u64 = 1;

    /// Sample-and-hold latency in cycles.
    pub const SNH_LAT: u64 = 1;

    /// Mux routing latency in cycles (both mux stages).
    pub const MUX_LAT: u64 = 1;

    /// ALU operation latency in cycles.
    pub const ALU_LAT: u64 = 1;

    /// Local memory bank access latency in cycles (data, instruction, and
    /// crossbar register banks).
    pub const MEM_LAT: u64 = 1;

    /// External memory interface round-trip latency in cycles.
    ///
    /// Models the EDRAM/bus round trip seen by `ld`/`st`. Set to
    /// [`crate::common::INFINITE_LATENCY`] for an always-miss hierarchy that
    /// only completes through the external hooks.
    pub const MEM_INTERFACE_LAT: u64 = 4;

    /// External memory capacity in words, backing the memory interface.
    pub const EXT_MEM_SIZE: usize = 32;

    /// Watchdog: maximum simulated cycles for a run that never halts.
    pub const CYCLES_MAX: u64 = 1800;
}

/// Root configuration for one IMA core.
///
/// # Examples
///
/// ```
/// use ima_core::config::Config;
///
/// let json = r#"{
///     "general": { "core_id": 3, "cycles_max": 500 },
///     "geometry": { "num_xbar": 2, "xbar_size": 4, "num_adc": 2 },
///     "datapath": { "xbar_lat": 17 },
///     "memory": { "data_mem_size": 32 },
///     "format": { "data_width": 8, "frac_bits": 4 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// config.validate().unwrap();
/// assert_eq!(config.general.core_id, 3);
/// assert_eq!(config.geometry.num_xbar, 2);
/// assert_eq!(config.xbar_window(), 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Crossbar array geometry and converter counts.
    #[serde(default)]
    pub geometry: GeometryConfig,
    /// Per-unit latencies of the compute chain and ALU.
    #[serde(default)]
    pub datapath: DatapathConfig,
    /// Memory bank sizes and external interface latency.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Data width and fixed-point format.
    #[serde(default)]
    pub format: FormatConfig,
}

impl Config {
    /// Size of the crossbar register window in the unified address space.
    ///
    /// Addresses below this resolve to per-crossbar registers; addresses at
    /// or above it resolve to scalar data memory.
    pub const fn xbar_window(&self) -> usize {
        self.geometry.num_xbar * self.geometry.xbar_size
    }

    /// Fan-in of the second mux stage (crossbar lanes per ADC).
    pub const fn mux2_fan_in(&self) -> usize {
        self.geometry.num_xbar / self.geometry.num_adc
    }

    /// Number of bit-serial passes an MVM makes over the operand width.
    pub const fn mvm_passes(&self) -> u32 {
        self.format.xbdata_width / self.geometry.dac_res
    }

    /// Validates the parameter combination.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when any structural constraint is
    /// violated: zero-sized banks or arrays, an ADC count that does not
    /// divide the crossbar count, a DAC resolution that does not divide the
    /// operand width, or an unsupported data or operand width.
    pub fn validate(&self) -> Result<(), SimError> {
        let g = &self.geometry;
        let f = &self.format;

        if g.num_xbar == 0 || g.xbar_size == 0 {
            return Err(SimError::Config("crossbar geometry must be nonzero".into()));
        }
        if g.num_adc == 0 || g.num_xbar % g.num_adc != 0 {
            return Err(SimError::Config(format!(
                "num_adc ({}) must be nonzero and divide num_xbar ({})",
                g.num_adc, g.num_xbar
            )));
        }
        if g.num_alu == 0 {
            return Err(SimError::Config("num_alu must be nonzero".into()));
        }
        if g.dac_res == 0 || f.xbdata_width % g.dac_res != 0 {
            return Err(SimError::Config(format!(
                "dac_res ({}) must be nonzero and divide xbdata_width ({})",
                g.dac_res, f.xbdata_width
            )));
        }
        if f.data_width == 0 || f.data_width > 63 {
            return Err(SimError::Config(format!(
                "data_width ({}) must be in 1..=63",
                f.data_width
            )));
        }
        if f.xbdata_width == 0 || f.xbdata_width > 63 {
            return Err(SimError::Config(format!(
                "xbdata_width ({}) must be in 1..=63",
                f.xbdata_width
            )));
        }
        if f.frac_bits >= f.data_width {
            return Err(SimError::Config(format!(
                "frac_bits ({}) must leave at least one integer bit of data_width ({})",
                f.frac_bits, f.data_width
            )));
        }
        if self.memory.data_mem_size == 0 || self.memory.instrn_mem_size == 0 {
            return Err(SimError::Config("memory banks must be nonzero".into()));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Identifier of this core in trace output.
    ///
    /// Passed in explicitly at construction time; distinct cores in a larger
    /// simulation should be given distinct ids.
    #[serde(default)]
    pub core_id: usize,

    /// Watchdog: maximum simulated cycles before a non-halting run is stopped.
    #[serde(default = "GeneralConfig::default_cycles_max")]
    pub cycles_max: u64,
}

impl GeneralConfig {
    /// Returns the default watchdog cycle cap.
    fn default_cycles_max() -> u64 {
        defaults::CYCLES_MAX
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            core_id: 0,
            cycles_max: defaults::CYCLES_MAX,
        }
    }
}

/// Crossbar array geometry and converter counts.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryConfig {
    /// Number of crossbars.
    #[serde(default = "GeometryConfig::default_num_xbar")]
    pub num_xbar: usize,

    /// Rows/columns per crossbar.
    #[serde(default = "GeometryConfig::default_xbar_size")]
    pub xbar_size: usize,

    /// DAC resolution in bits.
    #[serde(default = "GeometryConfig::default_dac_res")]
    pub dac_res: u32,

    /// ADC resolution in bits.
    #[serde(default = "GeometryConfig::default_adc_res")]
    pub adc_res: u32,

    /// Number of ADCs shared across crossbars.
    #[serde(default = "GeometryConfig::default_num_adc")]
    pub num_adc: usize,

    /// Number of scalar ALUs.
    #[serde(default = "GeometryConfig::default_num_alu")]
    pub num_alu: usize,
}

impl GeometryConfig {
    /// Returns the default crossbar count.
    fn default_num_xbar() -> usize {
        defaults::NUM_XBAR
    }

    /// Returns the default crossbar size.
    fn default_xbar_size() -> usize {
        defaults::XBAR_SIZE
    }

    /// Returns the default DAC resolution.
    fn default_dac_res() -> u32 {
        defaults::DAC_RES
    }

    /// Returns the default ADC resolution.
    fn default_adc_res() -> u32 {
        defaults::ADC_RES
    }

    /// Returns the default ADC count.
    fn default_num_adc() -> usize {
        defaults::NUM_ADC
    }

    /// Returns the default ALU count.
    fn default_num_alu() -> usize {
        defaults::NUM_ALU
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            num_xbar: defaults::NUM_XBAR,
            xbar_size: defaults::XBAR_SIZE,
            dac_res: defaults::DAC_RES,
            adc_res: defaults::ADC_RES,
            num_adc: defaults::NUM_ADC,
            num_alu: defaults::NUM_ALU,
        }
    }
}

/// Per-unit latencies of the compute chain, ALU, and local banks.
#[derive(Debug, Clone, Deserialize)]
pub struct DatapathConfig {
    /// Crossbar analog evaluation latency.
    #[serde(default = "DatapathConfig::default_xbar_lat")]
    pub xbar_lat: u64,

    /// DAC conversion latency.
    #[serde(default = "DatapathConfig::default_dac_lat")]
    pub dac_lat: u64,

    /// ADC conversion latency.
    #[serde(default = "DatapathConfig::default_adc_lat")]
    pub adc_lat: u64,

    /// Sample-and-hold latency.
    #[serde(default = "DatapathConfig::default_snh_lat")]
    pub snh_lat: u64,

    /// Mux routing latency (both stages).
    #[serde(default = "DatapathConfig::default_mux_lat")]
    pub mux_lat: u64,

    /// ALU operation latency.
    #[serde(default = "DatapathConfig::default_alu_lat")]
    pub alu_lat: u64,

    /// Local memory bank access latency.
    #[serde(default = "DatapathConfig::default_mem_lat")]
    pub mem_lat: u64,
}

impl DatapathConfig {
    /// Returns the default crossbar latency.
    fn default_xbar_lat() -> u64 {
        defaults::XBAR_LAT
    }

    /// Returns the default DAC latency.
    fn default_dac_lat() -> u64 {
        defaults::DAC_LAT
    }

    /// Returns the default ADC latency.
    fn default_adc_lat() -> u64 {
        defaults::ADC_LAT
    }

    /// Returns the default sample-and-hold latency.
    fn default_snh_lat() -> u64 {
        defaults::SNH_LAT
    }

    /// Returns the default mux latency.
    fn default_mux_lat() -> u64 {
        defaults::MUX_LAT
    }

    /// Returns the default ALU latency.
    fn default_alu_lat() -> u64 {
        defaults::ALU_LAT
    }

    /// Returns the default local bank latency.
    fn default_mem_lat() -> u64 {
        defaults::MEM_LAT
    }
}

impl Default for DatapathConfig {
    fn default() -> Self {
        Self {
            xbar_lat: defaults::XBAR_LAT,
            dac_lat: defaults::DAC_LAT,
            adc_lat: defaults::ADC_LAT,
            snh_lat: defaults::SNH_LAT,
            mux_lat: defaults::MUX_LAT,
            alu_lat: defaults::ALU_LAT,
            mem_lat: defaults::MEM_LAT,
        }
    }
}

/// Memory bank sizes and external interface latency.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Scalar data memory capacity in words.
    #[serde(default = "MemoryConfig::default_data_mem_size")]
    pub data_mem_size: usize,

    /// Instruction memory capacity in instructions.
    #[serde(default = "MemoryConfig::default_instrn_mem_size")]
    pub instrn_mem_size: usize,

    /// External memory interface round-trip latency.
    ///
    /// [`crate::common::INFINITE_LATENCY`] models an always-miss hierarchy.
    #[serde(default = "MemoryConfig::default_mem_interface_lat")]
    pub mem_interface_lat: u64,

    /// External memory capacity in words.
    #[serde(default = "MemoryConfig::default_ext_mem_size")]
    pub ext_mem_size: usize,
}

impl MemoryConfig {
    /// Returns the default data memory capacity.
    fn default_data_mem_size() -> usize {
        defaults::DATA_MEM_SIZE
    }

    /// Returns the default instruction memory capacity.
    fn default_instrn_mem_size() -> usize {
        defaults::INSTRN_MEM_SIZE
    }

    /// Returns the default external interface latency.
    fn default_mem_interface_lat() -> u64 {
        defaults::MEM_INTERFACE_LAT
    }

    /// Returns the default external memory capacity.
    fn default_ext_mem_size() -> usize {
        defaults::EXT_MEM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_mem_size: defaults::DATA_MEM_SIZE,
            instrn_mem_size: defaults::INSTRN_MEM_SIZE,
            mem_interface_lat: defaults::MEM_INTERFACE_LAT,
            ext_mem_size: defaults::EXT_MEM_SIZE,
        }
    }
}

/// Data width and fixed-point format.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    /// Architectural data width in bits.
    ///
    /// ALU results are wrapped into this width; a result that does not fit
    /// reports (non-fatal) overflow.
    #[serde(default = "FormatConfig::default_data_width")]
    pub data_width: u32,

    /// Crossbar operand width in bits.
    #[serde(default = "FormatConfig::default_xbdata_width")]
    pub xbdata_width: u32,

    /// Fractional bits of the fixed-point interpretation.
    ///
    /// Only the sigmoid unit interprets words as fixed point; every other
    /// operation is format-agnostic integer arithmetic.
    #[serde(default = "FormatConfig::default_frac_bits")]
    pub frac_bits: u32,
}

impl FormatConfig {
    /// Returns the default data width.
    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    /// Returns the default crossbar operand width.
    fn default_xbdata_width() -> u32 {
        defaults::XBDATA_WIDTH
    }

    /// Returns the default fractional bit count.
    fn default_frac_bits() -> u32 {
        defaults::FRAC_BITS
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            data_width: defaults::DATA_WIDTH,
            xbdata_width: defaults::XBDATA_WIDTH,
            frac_bits: defaults::FRAC_BITS,
        }
    }
}
