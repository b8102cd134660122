//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the registers carried between the three pipeline
//! stages: Fetch → Decode → Execute.
//!
//! 1. **Fetch/decode latch:** The raw in-flight instruction.
//! 2. **Decode/execute latch:** The decoded operation with operand addresses
//!    already resolved through the unified register space and operand values
//!    already read.
//!
//! Latches are overwritten each time their producing stage commits and are
//! read-only to the consuming stage.

use crate::common::{Addr, Word};
use crate::isa::{AluOp, Instruction};

/// The fetch → decode latch.
///
/// `None` means no instruction has been fetched into it yet.
#[derive(Debug, Clone, Default)]
pub struct FetchDecode {
    /// The fetched instruction awaiting decode.
    pub instrn: Option<Instruction>,
}

/// A decoded operation with resolved operands.
///
/// Decode folds `alui` into [`DecodedOp::Alu`] by resolving the immediate
/// into the second operand slot; execute no longer distinguishes them except
/// for statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedOp {
    /// Load from external memory into the unified register space.
    Load {
        /// Destination address (data memory or crossbar input register).
        dest: Addr,
        /// External memory address.
        addr: Addr,
    },
    /// Store to external memory.
    Store {
        /// External memory address.
        addr: Addr,
        /// Operand value read at decode.
        value: Word,
        /// Repeat/vector counter for the write request.
        count: Word,
    },
    /// Scalar ALU operation with both operand values resolved.
    Alu {
        /// ALU function.
        aluop: AluOp,
        /// Destination address (must resolve to data memory).
        dest: Addr,
        /// First operand value.
        val1: Word,
        /// Second operand value (register read or immediate).
        val2: Word,
    },
    /// Matrix-vector multiply over the first `xb_nma` crossbars.
    Mvm {
        /// Validated crossbar activation count.
        xb_nma: usize,
    },
    /// Halt.
    Halt,
}

/// The decode → execute latch.
#[derive(Debug, Clone, Default)]
pub struct DecodeExecute {
    /// The decoded operation awaiting execution.
    pub op: Option<DecodedOp>,
    /// The originating instruction, kept for trace output and statistics.
    pub instrn: Option<Instruction>,
}
