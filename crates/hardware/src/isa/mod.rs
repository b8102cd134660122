//! Instruction set for the IMA core.
//!
//! This module defines the instruction records consumed by the pipeline:
//! 1. **Opcodes:** `ld`, `st`, `alu`, `alui`, `mvm`, `hlt` as a tagged enum;
//!    each variant carries only the fields that opcode uses.
//! 2. **ALU operations:** `add`, `sub`, `mul`, `sna`, `sigmoid`.
//! 3. **Serialization:** serde-tagged JSON, the on-disk program format.
//!
//! Instructions are created by external assembly tooling, loaded once into
//! instruction memory, and immutable for the lifetime of a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{Addr, Word};

/// Scalar ALU operation selector.
///
/// `Sna` (shift-and-accumulate) is shared between scalar `alu`/`alui`
/// instructions and the MVM partial-sum accumulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AluOp {
    /// Two's-complement addition.
    Add,
    /// Two's-complement subtraction.
    Sub,
    /// Two's-complement multiplication.
    Mul,
    /// Shift `val2` left by the given amount, then add `val1`.
    Sna,
    /// Logistic function over the fixed-point interpretation of `val1`.
    Sigmoid,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Sna => "sna",
            Self::Sigmoid => "sigmoid",
        };
        f.write_str(s)
    }
}

/// One IMA instruction.
///
/// Addresses (`dest`, `r1`, `r2`, `addr`) live in the unified register space:
/// values below `num_xbar * xbar_size` name a crossbar register lane, values
/// at or above it name a data memory word. The external `addr` of `ld`/`st`
/// indexes the memory behind the external interface instead.
///
/// # Examples
///
/// ```
/// use ima_core::isa::{AluOp, Instruction};
///
/// let json = r#"{ "op": "alui", "aluop": "add", "dest": 24, "r1": 25, "imm": 3 }"#;
/// let inst: Instruction = serde_json::from_str(json).unwrap();
/// assert_eq!(
///     inst,
///     Instruction::Alui { aluop: AluOp::Add, dest: 24, r1: 25, imm: 3 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Instruction {
    /// Load a word from external memory into the unified register space.
    Ld {
        /// Destination address (data memory or crossbar *input* register).
        dest: Addr,
        /// External memory address to read.
        addr: Addr,
    },

    /// Store a word from the unified register space to external memory.
    St {
        /// External memory address to write.
        addr: Addr,
        /// Source address of the value (data memory or crossbar *output*
        /// register).
        r1: Addr,
        /// Repeat/vector counter carried on the write request.
        count: Word,
    },

    /// Scalar ALU operation over two register operands.
    Alu {
        /// ALU function.
        aluop: AluOp,
        /// Destination address (must resolve to data memory).
        dest: Addr,
        /// First operand address.
        r1: Addr,
        /// Second operand address.
        r2: Addr,
    },

    /// Scalar ALU operation with an immediate second operand.
    Alui {
        /// ALU function.
        aluop: AluOp,
        /// Destination address (must resolve to data memory).
        dest: Addr,
        /// First operand address.
        r1: Addr,
        /// Immediate second operand.
        imm: Word,
    },

    /// Matrix-vector multiply over the first `xb_nma` crossbars.
    Mvm {
        /// Number of crossbars to evaluate; must not exceed `num_xbar`.
        xb_nma: usize,
    },

    /// Halt the core. The halt flag is monotonic and terminal.
    Hlt,
}

impl Instruction {
    /// Returns the opcode mnemonic, for traces and statistics.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Ld { .. } => "ld",
            Self::St { .. } => "st",
            Self::Alu { .. } => "alu",
            Self::Alui { .. } => "alui",
            Self::Mvm { .. } => "mvm",
            Self::Hlt => "hlt",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ld { dest, addr } => write!(f, "ld d1={dest} addr={addr}"),
            Self::St { addr, r1, count } => write!(f, "st addr={addr} r1={r1} count={count}"),
            Self::Alu { aluop, dest, r1, r2 } => {
                write!(f, "alu {aluop} d1={dest} r1={r1} r2={r2}")
            }
            Self::Alui { aluop, dest, r1, imm } => {
                write!(f, "alui {aluop} d1={dest} r1={r1} imm={imm}")
            }
            Self::Mvm { xb_nma } => write!(f, "mvm xb_nma={xb_nma}"),
            Self::Hlt => f.write_str("hlt"),
        }
    }
}
