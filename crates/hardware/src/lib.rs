//! Compute-in-memory accelerator (IMA) core simulator library.
//!
//! This crate implements a cycle-accurate functional simulator of a single IMA
//! core with the following:
//! 1. **Core:** Three-stage pipeline (fetch, decode, execute) with
//!    backward-propagated stall/ready signalling and variable stage latencies.
//! 2. **Datapath:** Resistive-crossbar compute chain (DAC, crossbar,
//!    sample-and-hold, mux, ADC) driven by the matrix-vector-multiply
//!    instruction, plus a shared scalar ALU.
//! 3. **Memory:** Scalar data memory, per-crossbar input/output registers,
//!    instruction memory, and a request/response external memory interface.
//! 4. **ISA:** Tagged instruction records (`ld`, `st`, `alu`, `alui`, `mvm`,
//!    `hlt`) loadable from JSON program files.
//! 5. **Simulation:** Driver loop with watchdog, per-cycle trace events, and
//!    statistics collection.

/// Common types and the simulator error taxonomy.
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures).
pub mod config;
/// IMA core (pipeline engine, functional units).
pub mod core;
/// Instruction set (opcodes, ALU operations, program records).
pub mod isa;
/// Memory banks and the external memory interface.
pub mod memory;
/// Fixed-point and bit-string numeric conversion helpers.
pub mod numeric;
/// Program loader and simulation driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main core type; holds the pipeline, memory banks, and functional units.
pub use crate::core::Ima;
/// Simulator driver; construct with `Simulator::new` and loop on `tick`.
pub use crate::sim::simulator::Simulator;
