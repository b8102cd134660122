//! Scalar ALU tests.

use ima_core::core::units::Alu;
use ima_core::isa::AluOp;
use rstest::rstest;

#[rstest]
#[case(AluOp::Add, 5, 3, 8)]
#[case(AluOp::Add, -5, 3, -2)]
#[case(AluOp::Sub, 5, 3, 2)]
#[case(AluOp::Sub, 3, 5, -2)]
#[case(AluOp::Mul, 6, -4, -24)]
#[case(AluOp::Mul, 0, 127, 0)]
fn basic_arithmetic(#[case] op: AluOp, #[case] a: i64, #[case] b: i64, #[case] expected: i64) {
    let alu = Alu::new(8, 4, 1);
    assert_eq!(alu.propagate(a, b, op, 0), (expected, false));
}

#[rstest]
#[case(100, 100, -56)] // 200 wraps in 8 bits
#[case(-100, -100, 56)]
fn add_overflow_wraps_and_reports(#[case] a: i64, #[case] b: i64, #[case] wrapped: i64) {
    let alu = Alu::new(8, 4, 1);
    assert_eq!(alu.propagate(a, b, AluOp::Add, 0), (wrapped, true));
}

#[test]
fn mul_overflow_wraps_and_reports() {
    let alu = Alu::new(8, 4, 1);
    // 16 * 16 = 256 = 0 mod 2^8
    assert_eq!(alu.propagate(16, 16, AluOp::Mul, 0), (0, true));
}

#[test]
fn overflow_is_judged_against_the_data_width() {
    // The same operands fit a 16-bit word.
    let wide = Alu::new(16, 4, 1);
    assert_eq!(wide.propagate(100, 100, AluOp::Add, 0), (200, false));
}

#[rstest]
#[case(0, 3, 0, 3)] // no shift: plain accumulate
#[case(1, 3, 2, 13)] // 1 + (3 << 2)
#[case(5, 2, 4, 37)] // 5 + (2 << 4)
fn shift_and_accumulate(
    #[case] acc: i64,
    #[case] slice: i64,
    #[case] shift: u32,
    #[case] expected: i64,
) {
    let alu = Alu::new(8, 4, 1);
    assert_eq!(alu.propagate(acc, slice, AluOp::Sna, shift), (expected, false));
}

#[test]
fn sigmoid_at_zero_is_half() {
    // Q4.4: sigmoid(0) = 0.5 = 8/16.
    let alu = Alu::new(8, 4, 1);
    assert_eq!(alu.propagate(0, 0, AluOp::Sigmoid, 0), (8, false));
}

#[test]
fn sigmoid_saturates_toward_the_rails() {
    let alu = Alu::new(8, 4, 1);
    // sigmoid(7.0) ~ 0.9991 -> 16/16 after rounding.
    assert_eq!(alu.propagate(112, 0, AluOp::Sigmoid, 0), (16, false));
    // sigmoid(-1.0) ~ 0.2689 -> 4/16.
    assert_eq!(alu.propagate(-16, 0, AluOp::Sigmoid, 0), (4, false));
}

#[test]
fn latency_is_reported() {
    let alu = Alu::new(8, 4, 3);
    assert_eq!(alu.latency(), 3);
}
