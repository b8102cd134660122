//! Simulation statistics collection and reporting.
//!
//! This module tracks the observable metrics of a run. It provides:
//! 1. **Cycle counts:** Total simulated cycles and wall-clock duration.
//! 2. **Instruction mix:** Retired counts per opcode class.
//! 3. **Overflow:** Non-fatal ALU overflow occurrences (observability-only;
//!    overflowing results are still committed).

use std::fmt;
use std::time::Instant;

/// Statistics for one simulation run.
#[derive(Debug, Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulated cycles elapsed.
    pub cycles: u64,

    /// Retired `ld` instructions.
    pub retired_ld: u64,
    /// Retired `st` instructions.
    pub retired_st: u64,
    /// Retired `alu` instructions.
    pub retired_alu: u64,
    /// Retired `alui` instructions.
    pub retired_alui: u64,
    /// Retired `mvm` instructions.
    pub retired_mvm: u64,
    /// Retired `hlt` instructions.
    pub retired_hlt: u64,

    /// ALU overflow occurrences (results were still committed).
    pub overflows: u64,
}

impl SimStats {
    /// Creates a zeroed statistics block with the clock started.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            retired_ld: 0,
            retired_st: 0,
            retired_alu: 0,
            retired_alui: 0,
            retired_mvm: 0,
            retired_hlt: 0,
            overflows: 0,
        }
    }

    /// Total retired instructions across all classes.
    pub const fn retired_total(&self) -> u64 {
        self.retired_ld
            + self.retired_st
            + self.retired_alu
            + self.retired_alui
            + self.retired_mvm
            + self.retired_hlt
    }

    /// Wall-clock seconds since the block was created.
    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for SimStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Simulation statistics =====")?;
        writeln!(f, "cycles:          {}", self.cycles)?;
        writeln!(f, "retired total:   {}", self.retired_total())?;
        writeln!(f, "  ld:            {}", self.retired_ld)?;
        writeln!(f, "  st:            {}", self.retired_st)?;
        writeln!(f, "  alu:           {}", self.retired_alu)?;
        writeln!(f, "  alui:          {}", self.retired_alui)?;
        writeln!(f, "  mvm:           {}", self.retired_mvm)?;
        writeln!(f, "  hlt:           {}", self.retired_hlt)?;
        writeln!(f, "alu overflows:   {}", self.overflows)?;
        write!(f, "wall time:       {:.3}s", self.elapsed_seconds())
    }
}
