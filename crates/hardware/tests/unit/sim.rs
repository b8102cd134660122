//! End-to-end scenarios through the driver loop, plus program loading.

use crate::common::TestContext;
use ima_core::common::SimError;
use ima_core::config::Config;
use ima_core::isa::{AluOp, Instruction};
use ima_core::numeric::{fixed_to_float, float_to_fixed};
use ima_core::sim::loader;
use ima_core::sim::simulator::{Simulator, StopReason};

#[test]
fn programs_parse_from_json() {
    let json = r#"[
        { "op": "ld", "dest": 0, "addr": 4 },
        { "op": "alui", "aluop": "add", "dest": 24, "r1": 25, "imm": 3 },
        { "op": "hlt" }
    ]"#;
    let program = loader::parse_program(json).unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program[0], Instruction::Ld { dest: 0, addr: 4 });
    assert_eq!(program[2], Instruction::Hlt);
}

#[test]
fn malformed_programs_are_rejected() {
    assert!(matches!(
        loader::parse_program("not json"),
        Err(SimError::Parse(_))
    ));
    assert!(matches!(
        loader::parse_program(r#"[{ "op": "nop" }]"#),
        Err(SimError::Parse(_))
    ));
}

#[test]
fn oversized_program_is_rejected_at_load() {
    let mut config = Config::default();
    config.memory.instrn_mem_size = 2;
    let mut sim = Simulator::new(config).unwrap();
    let program = vec![Instruction::Hlt; 3];
    assert!(matches!(
        sim.load_program(program),
        Err(SimError::ProgramTooLarge { len: 3, capacity: 2 })
    ));
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let mut config = Config::default();
    config.geometry.num_adc = 5;
    assert!(matches!(Simulator::new(config), Err(SimError::Config(_))));

    // An operand width past the shift range never reaches the mvm datapath.
    let mut config = Config::default();
    config.format.xbdata_width = 128;
    assert!(matches!(Simulator::new(config), Err(SimError::Config(_))));
}

#[test]
fn load_of_a_fixed_point_constant() {
    // 0.5 in Q4.4 travels ext mem -> data mem unchanged.
    let half = float_to_fixed(0.5, 4, 4);
    let mut ctx = TestContext::new()
        .preload_ext(2, half)
        .load_program(&[Instruction::Ld { dest: 24, addr: 2 }, Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(fixed_to_float(ctx.data(24), 4, 4), 0.5);
}

#[test]
fn load_then_add_immediate() {
    let mut ctx = TestContext::new().preload_ext(0, 5).load_program(&[
        Instruction::Ld { dest: 25, addr: 0 },
        Instruction::Alui { aluop: AluOp::Add, dest: 24, r1: 25, imm: 3 },
        Instruction::Hlt,
    ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 9);
    assert_eq!(ctx.data(24), 8);
    assert_eq!(ctx.sim.core.stats.overflows, 0);
    assert_eq!(ctx.sim.core.stats.retired_total(), 3);
}

#[test]
fn sigmoid_through_the_pipeline() {
    let mut ctx = TestContext::new().with_data(25, 0).load_program(&[
        Instruction::Alui { aluop: AluOp::Sigmoid, dest: 24, r1: 25, imm: 0 },
        Instruction::Hlt,
    ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    // sigmoid(0) = 0.5 in Q4.4.
    assert_eq!(ctx.data(24), 8);
}

#[test]
fn overflow_is_reported_but_does_not_abort() {
    let mut ctx = TestContext::new().with_data(25, 100).load_program(&[
        Instruction::Alui { aluop: AluOp::Add, dest: 24, r1: 25, imm: 100 },
        Instruction::Hlt,
    ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.data(24), -56);
    assert_eq!(ctx.sim.core.stats.overflows, 1);
    assert_eq!(ctx.sim.core.stats.retired_alui, 1);
}

#[test]
fn load_compute_store_round_trip() {
    let mut ctx = TestContext::new().preload_ext(0, 20).load_program(&[
        Instruction::Ld { dest: 24, addr: 0 },
        Instruction::Alui { aluop: AluOp::Mul, dest: 25, r1: 24, imm: 3 },
        Instruction::St { addr: 1, r1: 25, count: 1 },
        Instruction::Hlt,
    ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.mem_interface.inspect(1).unwrap(), 60);
    assert_eq!(ctx.sim.core.stats.retired_total(), 4);
}

#[test]
fn reloading_a_program_resets_the_run() {
    let mut ctx = TestContext::new().load_program(&[Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);

    ctx = ctx.load_program(&[Instruction::Hlt]);
    assert!(!ctx.sim.core.halt);
    assert_eq!(ctx.sim.cycle, 0);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 3);
}
