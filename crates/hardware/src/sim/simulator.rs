//! Simulator: owns the core and drives the cycle loop.
//!
//! The caller owns the cycle counter and the loop: repeatedly invoke
//! [`Simulator::tick`] until the halt flag is set, or use [`Simulator::run`]
//! which wraps the loop with the configured maximum-cycle watchdog.

use crate::common::SimError;
use crate::config::Config;
use crate::core::Ima;
use crate::isa::Instruction;

/// Why a [`Simulator::run`] loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The halt flag was set (explicit `hlt` or end-of-program sentinel).
    Halted,
    /// The watchdog cycle cap was reached before halt.
    Watchdog,
}

/// Top-level simulator: one IMA core plus the run loop.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated core.
    pub core: Ima,
    /// Cycles simulated so far (caller-visible cycle counter).
    pub cycle: u64,
}

impl Simulator {
    /// Creates a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when the configuration is invalid.
    pub fn new(config: Config) -> Result<Self, SimError> {
        Ok(Self {
            core: Ima::new(config)?,
            cycle: 0,
        })
    }

    /// Loads a program and resets the pipeline and cycle counter.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ProgramTooLarge`] when the program exceeds
    /// instruction memory capacity.
    pub fn load_program(&mut self, program: Vec<Instruction>) -> Result<(), SimError> {
        self.core.load_program(program)?;
        self.cycle = 0;
        Ok(())
    }

    /// Advances the simulation by one clock cycle and emits the trace
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Propagates fatal stage errors; the run is not recoverable afterwards.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.core.tick()?;
        self.cycle += 1;
        if tracing::enabled!(target: "ima::pipeline", tracing::Level::DEBUG) {
            tracing::debug!(target: "ima::pipeline", "\n{}", self.core.snapshot(self.cycle));
        }
        Ok(())
    }

    /// Runs until halt or the configured watchdog cap.
    ///
    /// # Errors
    ///
    /// Propagates fatal stage errors.
    pub fn run(&mut self) -> Result<StopReason, SimError> {
        let cap = self.core.config.general.cycles_max;
        while self.cycle < cap {
            self.tick()?;
            if self.core.halt {
                tracing::debug!(
                    target: "ima",
                    core_id = self.core.config.general.core_id,
                    cycle = self.cycle,
                    "halted"
                );
                return Ok(StopReason::Halted);
            }
        }
        tracing::warn!(
            target: "ima",
            core_id = self.core.config.general.core_id,
            cycle = self.cycle,
            "watchdog cycle cap reached before halt"
        );
        Ok(StopReason::Watchdog)
    }
}
