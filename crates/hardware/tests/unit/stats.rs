//! Statistics accounting and report formatting tests.

use crate::common::TestContext;
use ima_core::isa::{AluOp, Instruction};
use ima_core::sim::simulator::StopReason;
use ima_core::stats::SimStats;

#[test]
fn new_stats_are_zeroed() {
    let stats = SimStats::new();
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.retired_total(), 0);
    assert_eq!(stats.overflows, 0);
}

#[test]
fn retired_total_sums_every_class() {
    let mut stats = SimStats::new();
    stats.retired_ld = 1;
    stats.retired_st = 2;
    stats.retired_alu = 3;
    stats.retired_alui = 4;
    stats.retired_mvm = 5;
    stats.retired_hlt = 1;
    assert_eq!(stats.retired_total(), 16);
}

#[test]
fn report_lists_the_instruction_mix() {
    let mut stats = SimStats::new();
    stats.cycles = 42;
    stats.retired_mvm = 2;
    let report = stats.to_string();
    assert!(report.contains("cycles:          42"));
    assert!(report.contains("mvm:           2"));
    assert!(report.contains("alu overflows:   0"));
}

#[test]
fn cycles_track_every_tick_including_stalls() {
    let mut ctx = TestContext::new().preload_ext(0, 1).load_program(&[
        Instruction::Ld { dest: 24, addr: 0 },
        Instruction::Hlt,
    ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.stats.cycles, ctx.sim.cycle);
}

#[test]
fn mix_counts_separate_alu_and_alui() {
    let mut ctx = TestContext::new()
        .with_data(25, 2)
        .with_data(26, 3)
        .load_program(&[
            Instruction::Alu { aluop: AluOp::Add, dest: 24, r1: 25, r2: 26 },
            Instruction::Alui { aluop: AluOp::Add, dest: 27, r1: 24, imm: 1 },
            Instruction::Hlt,
        ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.stats.retired_alu, 1);
    assert_eq!(ctx.sim.core.stats.retired_alui, 1);
    assert_eq!(ctx.data(24), 5);
    assert_eq!(ctx.data(27), 6);
}
