//! The three pipeline stage state machines.
//!
//! Each stage follows the same per-cycle shape: on its first cycle it computes
//! the target latency from the resource it will use; on its last cycle, once
//! the downstream stage is ready, it commits its latch update; on every other
//! cycle it accumulates. The execute stage adds the `ld`/`st` memory-wait
//! special cases.

/// Operand decode and register read.
pub mod decode;
/// Execute, memory access, and write back.
pub mod execute;
/// Instruction fetch.
pub mod fetch;
