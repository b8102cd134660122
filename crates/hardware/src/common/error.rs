//! Simulator error definitions.
//!
//! This module defines the fatal error taxonomy of the core. It provides:
//! 1. **Configuration errors:** Invalid parameter combinations and oversized
//!    programs, raised at construction/load time.
//! 2. **Run-time fatal errors:** Unsupported crossbar masks and invalid
//!    destination addresses, raised at pipeline stage entry or commit.
//!
//! Arithmetic overflow is deliberately *not* represented here: it is
//! observability-only and never aborts a run. Stages that are merely waiting
//! on a resource re-attempt next cycle without producing an error.

use thiserror::Error;

/// Fatal simulator errors.
///
/// Any variant aborts the run; none of them are retried. Transient
/// resource-not-ready conditions are part of the normal stall protocol and
/// never surface as a `SimError`.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid hardware parameter combination, detected at construction time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Program exceeds instruction memory capacity, detected at load time.
    #[error("program has {len} instructions but instruction memory holds {capacity}")]
    ProgramTooLarge {
        /// Number of instructions in the program.
        len: usize,
        /// Instruction memory capacity.
        capacity: usize,
    },

    /// An `mvm` instruction activates more crossbars than exist.
    #[error("mvm activates {xb_nma} crossbars but the core has {num_xbar}")]
    UnsupportedXbarMask {
        /// Requested crossbar activation count.
        xb_nma: usize,
        /// Configured crossbar count.
        num_xbar: usize,
    },

    /// A scalar ALU result was directed at the crossbar register window.
    ///
    /// `alu`/`alui` results may only be written to data memory.
    #[error("{op} destination {addr} falls inside the crossbar register window")]
    InvalidAluDestination {
        /// Opcode mnemonic for the offending instruction.
        op: &'static str,
        /// The unified destination address.
        addr: usize,
    },

    /// An address fell outside the bank it resolved to.
    #[error("address {addr} out of range for {bank} (capacity {capacity})")]
    AddressOutOfRange {
        /// Name of the bank that rejected the access.
        bank: &'static str,
        /// The offending address (bank-local).
        addr: usize,
        /// Capacity of the bank in words.
        capacity: usize,
    },

    /// A bit-string did not parse as a two's-complement value.
    #[error("malformed bit-string {0:?}")]
    MalformedBits(String),

    /// A program or configuration file could not be read.
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    /// A program or configuration file could not be parsed.
    #[error("could not parse file: {0}")]
    Parse(#[from] serde_json::Error),
}
