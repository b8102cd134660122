//! Pipeline engine: stage bookkeeping and the per-cycle protocol.
//!
//! This module implements the three-stage variable-latency pipeline:
//! 1. **Stage identity:** [`StageId`] in pipeline order, with per-stage
//!    [`StageState`] bookkeeping (`empty`, `cycle`, `latency`, `done`).
//! 2. **Per-cycle protocol:** [`step`] visits the stages in *reverse* order so
//!    each stage's `update_ready` signal ("my successor committed this cycle
//!    and can accept my output") is computed from the current cycle's
//!    downstream state before the upstream stage decides whether to commit.
//! 3. **Trace snapshots:** [`CycleSnapshot`] captures PC, stage flags, and
//!    in-flight instructions for the per-cycle trace side channel.

use std::fmt;

use crate::common::SimError;
use crate::core::Ima;

/// Pipeline latch structures.
pub mod latches;
/// The fetch, decode, and execute stage state machines.
pub mod stages;

/// Number of pipeline stages.
pub const NUM_STAGES: usize = 3;

/// Identifies one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    /// Instruction fetch.
    Fetch,
    /// Operand decode and register read.
    Decode,
    /// Execute and write back.
    Execute,
}

impl StageId {
    /// The stages in pipeline order.
    pub const ORDER: [Self; NUM_STAGES] = [Self::Fetch, Self::Decode, Self::Execute];

    /// Index of this stage into the bookkeeping array.
    pub const fn index(self) -> usize {
        match self {
            Self::Fetch => 0,
            Self::Decode => 1,
            Self::Execute => 2,
        }
    }

    /// Short mnemonic for trace output.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Fetch => "Fet",
            Self::Decode => "Dec",
            Self::Execute => "Exe",
        }
    }
}

/// Per-stage bookkeeping.
///
/// Invariant: a stage is `done` in a cycle if and only if it committed its
/// latch update and cleared the downstream `empty` flag; `cycle` resets to 0
/// on every commit.
#[derive(Debug, Clone, Copy)]
pub struct StageState {
    /// No instruction occupies this stage.
    pub empty: bool,
    /// Cycles elapsed in the current attempt.
    pub cycle: u64,
    /// Target cycles for the current instruction/stage combination, computed
    /// once at stage entry.
    pub latency: u64,
    /// The stage committed this cycle.
    pub done: bool,
}

impl StageState {
    /// State at pipeline reset: occupied only by fetch, everything `done` so
    /// the first readiness pass lets fetch proceed.
    const fn at_reset(empty: bool) -> Self {
        Self {
            empty,
            cycle: 0,
            latency: 0,
            done: true,
        }
    }

    /// Resets all three stages to their initial state.
    pub const fn reset_all() -> [Self; NUM_STAGES] {
        [
            Self::at_reset(false), // fetch starts occupied
            Self::at_reset(true),
            Self::at_reset(true),
        ]
    }
}

/// Advances every pipeline stage by one cycle.
///
/// Stages are visited in reverse order; the last stage is always ready, every
/// other stage's `update_ready` is its successor's `done` flag from this same
/// cycle evaluation.
///
/// # Errors
///
/// Propagates fatal stage errors (unsupported crossbar mask, invalid ALU
/// destination, out-of-range addresses). Transient resource waits are not
/// errors; the stage simply re-attempts next cycle.
pub fn step(ima: &mut Ima) -> Result<(), SimError> {
    for i in (0..NUM_STAGES).rev() {
        let update_ready = if i == NUM_STAGES - 1 {
            true
        } else {
            ima.stages[i + 1].done
        };
        match StageId::ORDER[i] {
            StageId::Fetch => stages::fetch::fetch_stage(ima, update_ready),
            StageId::Decode => stages::decode::decode_stage(ima, update_ready)?,
            StageId::Execute => stages::execute::execute_stage(ima, update_ready)?,
        }
    }
    Ok(())
}

/// Flags of one stage in a [`CycleSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct StageFlags {
    /// `empty` flag at the end of the cycle.
    pub empty: bool,
    /// `done` flag at the end of the cycle.
    pub done: bool,
    /// Cycles elapsed in the current attempt.
    pub cycle: u64,
}

/// Structured snapshot of the pipeline at the end of one cycle.
///
/// This is the per-cycle trace side channel; it has no functional effect.
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    /// Cycle number (caller-owned counter).
    pub cycle: u64,
    /// Core identifier from the configuration.
    pub core_id: usize,
    /// Program counter after this cycle.
    pub pc: usize,
    /// Per-stage flags, in pipeline order.
    pub stages: [StageFlags; NUM_STAGES],
    /// Instruction in the fetch/decode latch, rendered for display.
    pub decode_instrn: Option<String>,
    /// Instruction in the decode/execute latch, rendered for display.
    pub execute_instrn: Option<String>,
    /// Whether the halt flag is set.
    pub halted: bool,
}

impl fmt::Display for CycleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cycle {} (core {})", self.cycle, self.core_id)?;
        for (id, flags) in StageId::ORDER.iter().zip(self.stages.iter()) {
            write!(f, "{} |", id.mnemonic())?;
            match id {
                StageId::Fetch => write!(f, " PC {}", self.pc)?,
                StageId::Decode => {
                    write!(f, " Inst: {}", self.decode_instrn.as_deref().unwrap_or("-"))?;
                }
                StageId::Execute => {
                    write!(f, " Inst: {}", self.execute_instrn.as_deref().unwrap_or("-"))?;
                }
            }
            writeln!(
                f,
                " | Flags: empty {} done {} cycles {}",
                u8::from(flags.empty),
                u8::from(flags.done),
                flags.cycle
            )?;
        }
        if self.halted {
            writeln!(f, "core halted at cycle {}", self.cycle)?;
        }
        Ok(())
    }
}
