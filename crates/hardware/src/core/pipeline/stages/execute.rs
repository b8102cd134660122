//! Execute stage.
//!
//! Dispatches the decoded operation to the resource that serves it: the
//! external memory interface (`ld`/`st`), the shared ALU plus data memory
//! (`alu`/`alui`), or the analog compute chain (`mvm`). Two departures from
//! the plain latency countdown:
//!
//! - `st` is not considered committed until the memory interface's `wait`
//!   clears, overriding the countdown exit.
//! - `ld` performs its bank write one data-memory latency before the nominal
//!   last cycle: once `wait` clears, the one-shot `ld_access_done` flag jumps
//!   the stage clock forward so the register write overlaps the tail of the
//!   access.

use crate::common::SimError;
use crate::core::Ima;
use crate::core::pipeline::StageId;
use crate::core::pipeline::latches::DecodedOp;
use crate::core::RegisterRef;
use crate::isa::AluOp;

/// Executes one cycle of the execute stage.
///
/// `update_ready` is always true for the last pipeline stage; the parameter is
/// kept so all three stages share the same per-cycle signature.
///
/// # Errors
///
/// Returns a fatal [`SimError`] for an ALU destination inside the crossbar
/// window or an out-of-range bank access.
pub fn execute_stage(ima: &mut Ima, update_ready: bool) -> Result<(), SimError> {
    let s = StageId::Execute.index();
    if ima.stages[s].empty {
        return Ok(());
    }

    let is_load = matches!(ima.de.op, Some(DecodedOp::Load { .. }));
    let is_store = matches!(ima.de.op, Some(DecodedOp::Store { .. }));

    // First cycle: pin the latency to the execution resource and, for memory
    // instructions, put the request on the wire.
    if ima.stages[s].cycle == 0 {
        ima.stages[s].latency = match &ima.de.op {
            Some(DecodedOp::Load { addr, .. }) => {
                ima.mem_interface.read_request(*addr);
                ima.mem_interface.latency()
            }
            Some(DecodedOp::Store { addr, value, count }) => {
                ima.mem_interface.write_request(*addr, *value, *count);
                ima.mem_interface.latency()
            }
            Some(DecodedOp::Alu { .. }) => ima.alu.latency() + ima.data_mem.latency(),
            Some(DecodedOp::Mvm { xb_nma }) => mvm_latency(ima, *xb_nma),
            Some(DecodedOp::Halt) | None => 1,
        };

        // Single-cycle commit path; memory instructions always take the
        // wait-driven exits below.
        if ima.stages[s].latency == 1 && update_ready && !is_load && !is_store {
            commit_execute(ima)?;
        } else {
            ima.stages[s].cycle += 1;
        }
    } else if (ima.stages[s].cycle >= ima.stages[s].latency - 1 && update_ready)
        || (is_store && !ima.mem_interface.wait() && update_ready)
    {
        commit_execute(ima)?;
    } else if is_load && !ima.mem_interface.wait() && !ima.ld_access_done {
        // Access complete: the bank write pipelines into the access tail.
        ima.ld_access_done = true;
        ima.stages[s].cycle = ima.stages[s]
            .latency
            .saturating_sub(ima.data_mem.latency());
    } else {
        ima.stages[s].cycle += 1;
    }
    Ok(())
}

/// Commits the execute: perform the operation's effects and free the stage.
fn commit_execute(ima: &mut Ima) -> Result<(), SimError> {
    let s = StageId::Execute.index();

    match ima.de.op.clone() {
        Some(DecodedOp::Load { dest, .. }) => {
            ima.ld_access_done = false;
            let data = ima.mem_interface.load_value();
            match ima.resolve(dest) {
                RegisterRef::Data(addr) => ima.data_mem.write(addr, data)?,
                RegisterRef::XbarLane { xb, lane } => ima.xb_in_mem[xb].write(lane, data)?,
            }
            ima.stats.retired_ld += 1;
        }

        // The interface owns the store; nothing further happens in the core.
        Some(DecodedOp::Store { .. }) => ima.stats.retired_st += 1,

        Some(DecodedOp::Alu { aluop, dest, val1, val2 }) => {
            let (out, overflow) = ima.alu.propagate(val1, val2, aluop, 0);
            if overflow {
                ima.stats.overflows += 1;
                tracing::warn!(
                    target: "ima",
                    core_id = ima.config.general.core_id,
                    op = %aluop,
                    "ALU overflow, result allowed to run"
                );
            }
            // Scalar results may only land in data memory.
            if let RegisterRef::XbarLane { .. } = ima.resolve(dest) {
                return Err(SimError::InvalidAluDestination {
                    op: ima
                        .de
                        .instrn
                        .as_ref()
                        .map_or("alu", crate::isa::Instruction::mnemonic),
                    addr: dest,
                });
            }
            ima.data_mem.write(dest, out)?;
            match ima.de.instrn {
                Some(crate::isa::Instruction::Alui { .. }) => ima.stats.retired_alui += 1,
                _ => ima.stats.retired_alu += 1,
            }
        }

        Some(DecodedOp::Mvm { xb_nma }) => {
            run_mvm(ima, xb_nma)?;
            ima.stats.retired_mvm += 1;
        }

        Some(DecodedOp::Halt) => {
            ima.halt = true;
            ima.stats.retired_hlt += 1;
        }

        None => {}
    }

    ima.stages[s].done = true;
    ima.stages[s].cycle = 0;
    ima.stages[s].empty = true;
    Ok(())
}

/// Runs the analog compute chain for one `mvm` commit.
///
/// For each active crossbar: reset its output register, then for every
/// `dac_res`-bit slice of the operand width stream the input register through
/// DAC → crossbar → sample-and-hold, route every lane through
/// mux1 → mux2 → ADC, and fold the converted value into the output register
/// via the ALU's shift-and-accumulate; the output register's sequential
/// pointer rewinds after each slice.
fn run_mvm(ima: &mut Ima, xb_nma: usize) -> Result<(), SimError> {
    let xbar_size = ima.config.geometry.xbar_size;
    let num_adc = ima.config.geometry.num_adc;
    let dac_res = ima.config.geometry.dac_res;
    let passes = ima.config.mvm_passes();

    for i in 0..xb_nma {
        ima.xb_out_mem[i].reset();

        for k in 0..passes {
            // Bit-serial read of this slice across all lanes.
            let mut slices = Vec::with_capacity(xbar_size);
            for lane in 0..xbar_size {
                slices.push(ima.xb_in_mem[i].read_slice(lane, k, dac_res)?);
            }

            let out_dac = ima.dac_arrays[i].propagate(&slices);
            let out_xbar = ima.xbars[i].propagate(&out_dac);
            let out_snh = ima.snh_units[i].propagate(&out_xbar);

            let adc_id = i % num_adc;
            for &held in &out_snh {
                let out_mux1 = ima.mux1[i].propagate(held);
                let out_mux2 = ima.mux2[adc_id].propagate(out_mux1);
                let out_adc = ima.adcs[adc_id].propagate(out_mux2);

                let acc = ima.xb_out_mem[i].read_next()?;
                let (out_sna, overflow) =
                    ima.alu.propagate(acc, out_adc, AluOp::Sna, k * dac_res);
                if overflow {
                    ima.stats.overflows += 1;
                    tracing::warn!(
                        target: "ima",
                        core_id = ima.config.general.core_id,
                        op = %AluOp::Sna,
                        "ALU overflow, result allowed to run"
                    );
                }
                ima.xb_out_mem[i].write_next(out_sna)?;
            }

            ima.xb_out_mem[i].restart();
        }
    }
    Ok(())
}

/// Analytic MVM latency.
///
/// Models the chain as a two-stage internal pipeline: `unit1` is one lane
/// compute (input register, DAC, crossbar, sample-and-hold), `unit2` is the
/// lane drain (mux1, mux2, ADC, ALU, output register) across all lanes,
/// scaled by how many crossbars share each ADC. The slower of the two is paid
/// once per bit-serial pass, plus one pipeline fill pass.
pub fn mvm_latency(ima: &Ima, xb_nma: usize) -> u64 {
    let latency_unit1 = ima.xb_in_mem[0].latency()
        + ima.dac_arrays[0].latency()
        + ima.xbars[0].latency()
        + ima.snh_units[0].latency();

    let per_lane = ima.mux1[0].latency()
        + ima.mux2[0].latency()
        + ima.adcs[0].latency()
        + ima.alu.latency()
        + ima.xb_out_mem[0].latency();
    let adc_rounds = (xb_nma as u64).div_ceil(ima.config.geometry.num_adc as u64);
    let latency_unit2 = ima.config.geometry.xbar_size as u64 * per_lane * adc_rounds;

    let latency_unit = latency_unit1.max(latency_unit2);
    u64::from(ima.config.mvm_passes() + 1) * latency_unit
}
