//! Scalar Arithmetic Logic Unit (ALU).
//!
//! This module implements the single ALU shared by scalar `alu`/`alui`
//! instructions and the MVM accumulation loop. It provides:
//! 1. **Arithmetic:** add, sub, mul over two's-complement words.
//! 2. **Shift-and-accumulate (`sna`):** The MVM partial-sum combine: shift
//!    the converted bit-slice left, then add the running sum.
//! 3. **Sigmoid:** The logistic function over the fixed-point interpretation
//!    of the first operand.
//!
//! Overflow against the configured data width is detected and reported but
//! never blocks execution: the wrapped result is still committed. Keeping the
//! pipeline free of exception control flow is intentional; overflow is
//! observability-only.

use crate::common::Word;
use crate::isa::AluOp;
use crate::numeric::{fixed_to_float, float_to_fixed, wrap_to_width};

/// The scalar ALU.
#[derive(Debug)]
pub struct Alu {
    data_width: u32,
    frac_bits: u32,
    latency: u64,
}

impl Alu {
    /// Creates an ALU for the given word format.
    pub const fn new(data_width: u32, frac_bits: u32, latency: u64) -> Self {
        Self {
            data_width,
            frac_bits,
            latency,
        }
    }

    /// Operation latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Executes one ALU operation.
    ///
    /// `shift` is only meaningful for [`AluOp::Sna`], where the second
    /// operand is shifted left by `shift` bits before accumulation.
    ///
    /// # Returns
    ///
    /// The result wrapped into the configured data width, and a flag that is
    /// true when the unwrapped result did not fit (non-fatal overflow).
    ///
    /// # Examples
    ///
    /// ```
    /// use ima_core::core::units::Alu;
    /// use ima_core::isa::AluOp;
    ///
    /// let alu = Alu::new(8, 4, 1);
    /// assert_eq!(alu.propagate(5, 3, AluOp::Add, 0), (8, false));
    /// // 100 + 100 wraps in an 8-bit word
    /// assert_eq!(alu.propagate(100, 100, AluOp::Add, 0), (-56, true));
    /// // sna: 1 + (3 << 2)
    /// assert_eq!(alu.propagate(1, 3, AluOp::Sna, 2), (13, false));
    /// ```
    pub fn propagate(&self, val1: Word, val2: Word, op: AluOp, shift: u32) -> (Word, bool) {
        let wide = match op {
            AluOp::Add => i128::from(val1) + i128::from(val2),
            AluOp::Sub => i128::from(val1) - i128::from(val2),
            AluOp::Mul => i128::from(val1) * i128::from(val2),
            AluOp::Sna => i128::from(val1) + (i128::from(val2) << shift),
            AluOp::Sigmoid => i128::from(self.sigmoid(val1)),
        };
        let wrapped = wrap_to_width(wide as i64, self.data_width);
        (wrapped, i128::from(wrapped) != wide)
    }

    /// Logistic function over the fixed-point interpretation of `val`.
    ///
    /// The result lands in (0, 1) and always fits the word format, since the
    /// format keeps at least one integer bit.
    fn sigmoid(&self, val: Word) -> Word {
        let int_bits = self.data_width - self.frac_bits;
        let x = fixed_to_float(val, int_bits, self.frac_bits);
        let y = 1.0 / (1.0 + (-x).exp());
        float_to_fixed(y, int_bits, self.frac_bits)
    }
}
