//! Fixed-point and bit-string conversion helpers.
//!
//! This module implements the numeric encoding collaborators used to prepare
//! operands before loading them into simulated memory:
//! 1. **Fixed point:** `float <-> two's-complement fixed point` with
//!    round-to-nearest on the fractional scaling.
//! 2. **Bit-strings:** `integer <-> binary string` in two's complement, for
//!    trace output and test fixtures.
//!
//! The core itself consumes values already in the fixed-point representation;
//! these helpers live at the boundary.

use crate::common::{SimError, Word};

/// Wraps `value` into a `bits`-wide two's-complement range.
///
/// The low `bits` bits are kept and sign-extended back to an `i64`, which is
/// also how the ALU commits an overflowing result.
pub fn wrap_to_width(value: i64, bits: u32) -> Word {
    debug_assert!((1..=63).contains(&bits));
    let shift = 64 - bits;
    (value << shift) >> shift
}

/// Converts a float to a fixed-point word with `int_bits + frac_bits` total
/// bits.
///
/// The value is scaled by `2^frac_bits`, rounded to nearest, and wrapped into
/// the two's-complement range of the total width.
///
/// # Examples
///
/// ```
/// use ima_core::numeric::float_to_fixed;
///
/// // 0.5 in Q4.4 is 0b0000_1000
/// assert_eq!(float_to_fixed(0.5, 4, 4), 8);
/// assert_eq!(float_to_fixed(-1.0, 4, 4), -16);
/// ```
pub fn float_to_fixed(value: f64, int_bits: u32, frac_bits: u32) -> Word {
    let scaled = (value * 2f64.powi(frac_bits as i32)).round() as i64;
    wrap_to_width(scaled, int_bits + frac_bits)
}

/// Converts a fixed-point word back to a float.
///
/// # Examples
///
/// ```
/// use ima_core::numeric::fixed_to_float;
///
/// assert_eq!(fixed_to_float(8, 4, 4), 0.5);
/// assert_eq!(fixed_to_float(-16, 4, 4), -1.0);
/// ```
pub fn fixed_to_float(raw: Word, int_bits: u32, frac_bits: u32) -> f64 {
    let value = wrap_to_width(raw, int_bits + frac_bits);
    value as f64 / 2f64.powi(frac_bits as i32)
}

/// Renders a value as a `bits`-wide two's-complement bit-string.
///
/// # Examples
///
/// ```
/// use ima_core::numeric::int_to_bits;
///
/// assert_eq!(int_to_bits(5, 8), "00000101");
/// assert_eq!(int_to_bits(-1, 4), "1111");
/// ```
pub fn int_to_bits(value: Word, bits: u32) -> String {
    let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let unsigned = (value as u64) & mask;
    (0..bits)
        .rev()
        .map(|b| if (unsigned >> b) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Parses a `bits`-wide two's-complement bit-string back into a value.
///
/// # Errors
///
/// Returns [`SimError::MalformedBits`] when the string length does not match
/// `bits` or contains characters other than `0`/`1`.
///
/// # Examples
///
/// ```
/// use ima_core::numeric::bits_to_int;
///
/// assert_eq!(bits_to_int("00000101", 8).unwrap(), 5);
/// assert_eq!(bits_to_int("1111", 4).unwrap(), -1);
/// ```
pub fn bits_to_int(bit_string: &str, bits: u32) -> Result<Word, SimError> {
    if bit_string.len() != bits as usize || !bit_string.chars().all(|c| c == '0' || c == '1') {
        return Err(SimError::MalformedBits(bit_string.to_owned()));
    }
    let mut unsigned: u64 = 0;
    for c in bit_string.chars() {
        unsigned = (unsigned << 1) | u64::from(c == '1');
    }
    // Sign bit set: fold into the negative range.
    if bits < 64 && (unsigned >> (bits - 1)) & 1 == 1 {
        Ok((i128::from(unsigned) - (1i128 << bits)) as i64)
    } else {
        Ok(unsigned as i64)
    }
}
