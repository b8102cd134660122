//! Simulation driver and program loading.
//!
//! Provides the run loop (tick-until-halt with a watchdog) and utilities for
//! loading JSON program files into instruction memory.

/// JSON program loader.
pub mod loader;
/// The simulation driver.
pub mod simulator;

pub use simulator::{Simulator, StopReason};
