//! Common types shared across the simulator.
//!
//! This module gathers the pieces used by every other module:
//! 1. **Errors:** The [`SimError`] taxonomy for fatal conditions.
//! 2. **Words:** The simulated machine word and address types.

/// Simulator error taxonomy.
pub mod error;

pub use error::SimError;

/// A simulated machine word.
///
/// Memory banks and the ALU operate on sign-extended two's-complement values
/// narrowed to the configured `data_width`; an `i64` comfortably holds any
/// supported width.
pub type Word = i64;

/// A unified register-space or memory address.
///
/// Addresses below `num_xbar * xbar_size` resolve to per-crossbar registers,
/// addresses at or above it to scalar data memory.
pub type Addr = usize;

/// Sentinel latency for an always-miss external memory hierarchy.
///
/// A memory interface configured with this latency never completes a request
/// on its own; completion must come through the external
/// `complete_read`/`complete_write` hooks.
pub const INFINITE_LATENCY: u64 = u64::MAX;
