//! Fixed-point and bit-string conversion tests.

use ima_core::common::SimError;
use ima_core::numeric::{bits_to_int, fixed_to_float, float_to_fixed, int_to_bits, wrap_to_width};
use proptest::prelude::*;

#[test]
fn wrap_keeps_in_range_values() {
    assert_eq!(wrap_to_width(127, 8), 127);
    assert_eq!(wrap_to_width(-128, 8), -128);
    assert_eq!(wrap_to_width(0, 8), 0);
}

#[test]
fn wrap_folds_out_of_range_values() {
    assert_eq!(wrap_to_width(255, 8), -1);
    assert_eq!(wrap_to_width(128, 8), -128);
    assert_eq!(wrap_to_width(200, 8), -56);
    assert_eq!(wrap_to_width(-129, 8), 127);
}

#[test]
fn float_to_fixed_q4_4() {
    assert_eq!(float_to_fixed(0.5, 4, 4), 8);
    assert_eq!(float_to_fixed(-1.0, 4, 4), -16);
    assert_eq!(float_to_fixed(0.0, 4, 4), 0);
    assert_eq!(float_to_fixed(1.25, 4, 4), 20);
}

#[test]
fn float_to_fixed_rounds_to_nearest() {
    // 0.03 * 16 = 0.48 rounds to 0; 0.04 * 16 = 0.64 rounds to 1.
    assert_eq!(float_to_fixed(0.03, 4, 4), 0);
    assert_eq!(float_to_fixed(0.04, 4, 4), 1);
}

#[test]
fn fixed_to_float_q4_4() {
    assert_eq!(fixed_to_float(8, 4, 4), 0.5);
    assert_eq!(fixed_to_float(-16, 4, 4), -1.0);
    assert_eq!(fixed_to_float(20, 4, 4), 1.25);
}

#[test]
fn bit_strings_render_twos_complement() {
    assert_eq!(int_to_bits(5, 8), "00000101");
    assert_eq!(int_to_bits(-1, 4), "1111");
    assert_eq!(int_to_bits(-128, 8), "10000000");
}

#[test]
fn bit_strings_parse_twos_complement() {
    assert_eq!(bits_to_int("00000101", 8).unwrap(), 5);
    assert_eq!(bits_to_int("1111", 4).unwrap(), -1);
    assert_eq!(bits_to_int("10000000", 8).unwrap(), -128);
}

#[test]
fn malformed_bit_strings_are_rejected() {
    assert!(matches!(
        bits_to_int("0101", 8),
        Err(SimError::MalformedBits(_))
    ));
    assert!(matches!(
        bits_to_int("01x1", 4),
        Err(SimError::MalformedBits(_))
    ));
    assert!(matches!(bits_to_int("", 1), Err(SimError::MalformedBits(_))));
}

proptest! {
    #[test]
    fn fixed_point_round_trips(raw in -128i64..128) {
        // Every Q4.4 word is exactly representable as an f64.
        let value = fixed_to_float(raw, 4, 4);
        prop_assert_eq!(float_to_fixed(value, 4, 4), raw);
    }

    #[test]
    fn bit_strings_round_trip(value in -128i64..128) {
        let rendered = int_to_bits(value, 8);
        prop_assert_eq!(bits_to_int(&rendered, 8).unwrap(), value);
    }

    #[test]
    fn wrap_is_idempotent(value in any::<i64>(), bits in 1u32..=63) {
        let once = wrap_to_width(value, bits);
        prop_assert_eq!(wrap_to_width(once, bits), once);
    }
}
