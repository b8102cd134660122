//! Memory banks and the external memory interface.
//!
//! This module models every storage element of the core:
//! 1. **Banks:** Data memory, instruction memory, and the per-crossbar
//!    input/output register files, all fixed capacity and fixed latency.
//! 2. **Interface:** The request/response protocol to the external memory
//!    hierarchy used by `ld`/`st`, with configurable (possibly unbounded)
//!    latency.

/// Fixed-latency storage banks.
pub mod banks;
/// External memory interface (single outstanding request).
pub mod interface;

pub use banks::{DataMemory, InstructionMemory, XbarInputMemory, XbarOutputMemory};
pub use interface::MemInterface;
