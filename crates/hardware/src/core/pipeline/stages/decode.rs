//! Operand decode stage.
//!
//! Resolves every address-bearing field through the unified register space,
//! reads operand values (data memory or crossbar output registers), folds the
//! `alui` immediate into the second operand slot, and validates the `mvm`
//! crossbar mask. The decoded operation lands in the decode/execute latch.

use crate::common::SimError;
use crate::core::Ima;
use crate::core::pipeline::StageId;
use crate::core::pipeline::latches::DecodedOp;
use crate::isa::Instruction;

/// Executes one cycle of the decode stage.
///
/// `update_ready` is the execute stage's `done` flag from this cycle's
/// reverse-order pass.
///
/// # Errors
///
/// Returns [`SimError::UnsupportedXbarMask`] when an `mvm` activates more
/// crossbars than exist, or an address error when an operand read falls
/// outside its bank. Both are fatal.
pub fn decode_stage(ima: &mut Ima, update_ready: bool) -> Result<(), SimError> {
    let s = StageId::Decode.index();
    if ima.stages[s].empty {
        return Ok(());
    }

    // First cycle: operand reads are priced at the data memory latency.
    if ima.stages[s].cycle == 0 {
        ima.stages[s].latency = ima.data_mem.latency();

        if ima.stages[s].latency == 1 && update_ready {
            commit_decode(ima)?;
        } else {
            ima.stages[s].cycle += 1;
        }
    } else if ima.stages[s].cycle >= ima.stages[s].latency - 1 && update_ready {
        commit_decode(ima)?;
    } else {
        ima.stages[s].cycle += 1;
    }
    Ok(())
}

/// Commits the decode: populate the decode/execute latch and wake execute.
fn commit_decode(ima: &mut Ima) -> Result<(), SimError> {
    let s = StageId::Decode.index();
    let e = StageId::Execute.index();

    let Some(instrn) = ima.fd.instrn.clone() else {
        // Latch never filled; nothing to decode.
        ima.stages[s].empty = true;
        ima.stages[s].done = true;
        ima.stages[s].cycle = 0;
        return Ok(());
    };

    let op = match &instrn {
        Instruction::Ld { dest, addr } => DecodedOp::Load {
            dest: *dest,
            addr: *addr,
        },
        Instruction::St { addr, r1, count } => DecodedOp::Store {
            addr: *addr,
            value: ima.read_operand(*r1)?,
            count: *count,
        },
        Instruction::Alu { aluop, dest, r1, r2 } => DecodedOp::Alu {
            aluop: *aluop,
            dest: *dest,
            val1: ima.read_operand(*r1)?,
            val2: ima.read_operand(*r2)?,
        },
        Instruction::Alui { aluop, dest, r1, imm } => DecodedOp::Alu {
            aluop: *aluop,
            dest: *dest,
            val1: ima.read_operand(*r1)?,
            val2: *imm,
        },
        Instruction::Mvm { xb_nma } => {
            let num_xbar = ima.config.geometry.num_xbar;
            if *xb_nma > num_xbar {
                return Err(SimError::UnsupportedXbarMask {
                    xb_nma: *xb_nma,
                    num_xbar,
                });
            }
            DecodedOp::Mvm { xb_nma: *xb_nma }
        }
        Instruction::Hlt => DecodedOp::Halt,
    };

    tracing::trace!(target: "ima::pipeline", %instrn, "decode");
    ima.de.op = Some(op);
    ima.de.instrn = Some(instrn);

    ima.stages[e].empty = false;
    ima.stages[e].done = false;

    ima.stages[s].done = true;
    ima.stages[s].cycle = 0;
    ima.stages[s].empty = true;
    Ok(())
}
