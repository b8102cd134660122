//! Pipeline timing tests: drain semantics, memory instruction exits, and the
//! structural hazard on the single memory interface port.

use crate::common::TestContext;
use ima_core::common::{INFINITE_LATENCY, SimError};
use ima_core::config::Config;
use ima_core::core::RegisterRef;
use ima_core::isa::{AluOp, Instruction};
use ima_core::sim::simulator::StopReason;

#[test]
fn unified_addresses_split_at_the_window_boundary() {
    // Defaults: 6 crossbars of 4 lanes, so the window is addresses 0..24.
    let ctx = TestContext::new();
    let core = &ctx.sim.core;
    assert_eq!(core.resolve(0), RegisterRef::XbarLane { xb: 0, lane: 0 });
    assert_eq!(core.resolve(5), RegisterRef::XbarLane { xb: 1, lane: 1 });
    assert_eq!(core.resolve(23), RegisterRef::XbarLane { xb: 5, lane: 3 });
    assert_eq!(core.resolve(24), RegisterRef::Data(24));
    assert_eq!(core.resolve(1000), RegisterRef::Data(1000));
}

#[test]
fn address_resolution_is_deterministic() {
    let ctx = TestContext::new();
    for addr in 0..48 {
        assert_eq!(ctx.sim.core.resolve(addr), ctx.sim.core.resolve(addr));
    }
}

#[test]
fn empty_program_halts_immediately() {
    let mut ctx = TestContext::new().load_program(&[]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 1);
    assert_eq!(ctx.sim.core.stats.retired_total(), 0);
}

#[test]
fn explicit_halt_retires() {
    // fetch C1, decode C2, execute C3.
    let mut ctx = TestContext::new().load_program(&[Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 3);
    assert_eq!(ctx.sim.core.stats.retired_hlt, 1);
}

#[test]
fn program_without_halt_drains_and_stops() {
    let mut ctx = TestContext::new().with_data(25, 5).load_program(&[Instruction::Alui {
        aluop: AluOp::Add,
        dest: 24,
        r1: 25,
        imm: 3,
    }]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    // The in-flight instruction still retires before the drain halt.
    assert_eq!(ctx.sim.core.stats.retired_alui, 1);
    assert_eq!(ctx.data(24), 8);
    assert_eq!(ctx.sim.cycle, 4);
}

#[test]
fn load_occupies_execute_for_the_interface_round_trip() {
    // fetch C1, decode C2, execute C3..C6 (latency 4), hlt retires C7.
    let mut ctx = TestContext::new()
        .preload_ext(2, 8)
        .load_program(&[Instruction::Ld { dest: 24, addr: 2 }, Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 7);
    assert_eq!(ctx.data(24), 8);
    assert_eq!(ctx.sim.core.stats.retired_ld, 1);
}

#[test]
fn load_can_target_a_crossbar_input_lane() {
    // dest 5 resolves to crossbar 1, lane 1 (window is addresses 0..24).
    let mut ctx = TestContext::new()
        .preload_ext(0, 44)
        .load_program(&[Instruction::Ld { dest: 5, addr: 0 }, Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.xb_in_mem[1].read(1).unwrap(), 44);
}

#[test]
fn store_waits_for_the_interface() {
    let mut ctx = TestContext::new()
        .with_data(24, -3)
        .load_program(&[
            Instruction::St { addr: 6, r1: 24, count: 1 },
            Instruction::Hlt,
        ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.mem_interface.inspect(6).unwrap(), -3);
    assert_eq!(ctx.sim.core.mem_interface.last_write_count(), 1);
    assert_eq!(ctx.sim.core.stats.retired_st, 1);
}

#[test]
fn back_to_back_stores_serialize_on_the_port() {
    // The second store cannot issue until the first completes; each occupies
    // execute for the full round trip.
    let mut ctx = TestContext::new()
        .with_data(24, 10)
        .with_data(25, 20)
        .load_program(&[
            Instruction::St { addr: 0, r1: 24, count: 1 },
            Instruction::St { addr: 1, r1: 25, count: 2 },
            Instruction::Hlt,
        ]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.cycle, 11);
    assert_eq!(ctx.sim.core.mem_interface.inspect(0).unwrap(), 10);
    assert_eq!(ctx.sim.core.mem_interface.inspect(1).unwrap(), 20);
    assert_eq!(ctx.sim.core.stats.retired_st, 2);
}

#[test]
fn store_reads_a_crossbar_output_lane() {
    let mut ctx = TestContext::new().load_program(&[
        Instruction::St { addr: 3, r1: 2, count: 1 },
        Instruction::Hlt,
    ]);
    ctx.sim.core.xb_out_mem[0].write(2, 61).unwrap();
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    assert_eq!(ctx.sim.core.mem_interface.inspect(3).unwrap(), 61);
}

#[test]
fn infinite_latency_load_completes_through_the_hook() {
    let mut config = Config::default();
    config.memory.mem_interface_lat = INFINITE_LATENCY;
    let mut ctx = TestContext::with_config(config)
        .load_program(&[Instruction::Ld { dest: 24, addr: 0 }, Instruction::Hlt]);

    // Request issued at C3; the core stalls while the interface waits.
    ctx.run(5);
    assert!(!ctx.sim.core.halt);
    assert!(ctx.sim.core.mem_interface.wait());

    ctx.sim.core.mem_interface.complete_read(42);
    ctx.run(3);
    assert!(ctx.sim.core.halt);
    assert_eq!(ctx.data(24), 42);
    assert_eq!(ctx.sim.core.stats.retired_ld, 1);
}

#[test]
fn watchdog_stops_a_stalled_core() {
    let mut config = Config::default();
    config.memory.mem_interface_lat = INFINITE_LATENCY;
    config.general.cycles_max = 40;
    let mut ctx = TestContext::with_config(config)
        .load_program(&[Instruction::Ld { dest: 24, addr: 0 }]);
    assert_eq!(ctx.run_to_halt(), StopReason::Watchdog);
    assert_eq!(ctx.sim.cycle, 40);
    assert!(!ctx.sim.core.halt);
}

#[test]
fn alu_destination_in_the_crossbar_window_is_fatal() {
    let mut ctx = TestContext::new().with_data(25, 1).load_program(&[
        Instruction::Alui { aluop: AluOp::Add, dest: 3, r1: 25, imm: 1 },
        Instruction::Hlt,
    ]);
    let result = ctx.sim.run();
    assert!(matches!(
        result,
        Err(SimError::InvalidAluDestination { op: "alui", addr: 3 })
    ));
}

#[test]
fn decode_operand_out_of_range_is_fatal() {
    // r1 = 60 is past data memory (addresses 24..40 with the defaults).
    let mut ctx = TestContext::new().load_program(&[
        Instruction::Alui { aluop: AluOp::Add, dest: 24, r1: 60, imm: 1 },
        Instruction::Hlt,
    ]);
    let result = ctx.sim.run();
    assert!(matches!(
        result,
        Err(SimError::AddressOutOfRange { bank: "data memory", .. })
    ));
}

#[test]
fn halt_is_terminal() {
    let mut ctx = TestContext::new().load_program(&[Instruction::Hlt]);
    assert_eq!(ctx.run_to_halt(), StopReason::Halted);
    let halted_at = ctx.sim.cycle;
    // Further ticks do not revive the pipeline.
    ctx.run(5);
    assert!(ctx.sim.core.halt);
    assert_eq!(ctx.sim.core.stats.retired_total(), 1);
    assert_eq!(ctx.sim.cycle, halted_at + 5);
}
