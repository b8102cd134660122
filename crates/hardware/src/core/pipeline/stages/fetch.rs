//! Instruction fetch stage.
//!
//! Reads one instruction per commit from instruction memory at the current
//! program counter and advances it. Fetch never empties itself while the
//! program continues; reading past the loaded program (the end-of-program
//! sentinel) marks the stage empty so the pipeline drains, and the core halts
//! implicitly once every stage is empty instead of spinning until the
//! watchdog.

use crate::core::Ima;
use crate::core::pipeline::StageId;

/// Executes one cycle of the fetch stage.
///
/// `update_ready` is the decode stage's `done` flag from this cycle's
/// reverse-order pass; fetch only commits its latch update when decode has
/// room.
pub fn fetch_stage(ima: &mut Ima, update_ready: bool) {
    let s = StageId::Fetch.index();
    if ima.stages[s].empty {
        return;
    }

    // First cycle: pin the target latency to the instruction memory.
    if ima.stages[s].cycle == 0 {
        ima.stages[s].latency = ima.instrn_mem.latency();

        if ima.stages[s].latency == 1 && update_ready {
            commit_fetch(ima);
        } else {
            ima.stages[s].cycle += 1;
        }
    } else if ima.stages[s].cycle >= ima.stages[s].latency - 1 && update_ready {
        commit_fetch(ima);
    } else {
        ima.stages[s].cycle += 1;
    }
}

/// Commits the fetch: update the fetch/decode latch, wake decode, advance pc.
fn commit_fetch(ima: &mut Ima) {
    let s = StageId::Fetch.index();
    let d = StageId::Decode.index();

    match ima.instrn_mem.fetch(ima.pc) {
        Some(instrn) => {
            tracing::trace!(target: "ima::pipeline", pc = ima.pc, %instrn, "fetch");
            ima.fd.instrn = Some(instrn);
            ima.stages[d].empty = false;
            ima.stages[d].done = false;
            ima.pc += 1;
        }
        None => {
            // End-of-program sentinel: stop fetching, let the pipeline drain.
            tracing::debug!(target: "ima::pipeline", pc = ima.pc, "program end reached");
            ima.stages[s].empty = true;
        }
    }

    ima.stages[s].done = true;
    ima.stages[s].cycle = 0;
}
