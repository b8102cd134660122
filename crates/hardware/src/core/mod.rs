//! The IMA core: hardware units, memory banks, and pipeline state.
//!
//! This module defines [`Ima`], the single-core simulation state. It owns
//! every physical module (crossbars, converters, ALU, banks, the external
//! memory interface) and the virtual pipeline bookkeeping (program counter,
//! latches, stage flags, halt). All mutation is synchronous and single-writer:
//! one driver advances the core one cycle at a time.

use crate::common::{Addr, SimError, Word};
use crate::config::Config;
use crate::core::pipeline::latches::{DecodeExecute, FetchDecode};
use crate::core::pipeline::{CycleSnapshot, NUM_STAGES, StageFlags, StageState};
use crate::core::units::{Adc, Alu, Crossbar, DacArray, Mux, SampleHold};
use crate::isa::Instruction;
use crate::memory::{
    DataMemory, InstructionMemory, MemInterface, XbarInputMemory, XbarOutputMemory,
};
use crate::stats::SimStats;

/// Pipeline engine (stage state machines, latches, per-cycle protocol).
pub mod pipeline;
/// Functional units (ALU, analog compute chain).
pub mod units;

/// Resolution of a unified register-space address.
///
/// Applied identically wherever an address-bearing field is consumed: decode
/// operand reads, execute write-backs, and scalar destination checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRef {
    /// A crossbar register lane.
    XbarLane {
        /// Crossbar index (`addr / xbar_size`).
        xb: usize,
        /// Lane offset within the crossbar (`addr % xbar_size`).
        lane: usize,
    },
    /// A data-memory word (the unified address itself; the bank re-bases).
    Data(Addr),
}

/// One in-memory-computing accelerator core.
#[derive(Debug)]
pub struct Ima {
    /// Hardware configuration, fixed for the lifetime of the core.
    pub config: Config,

    /// Scalar data memory.
    pub data_mem: DataMemory,
    /// Instruction memory.
    pub instrn_mem: InstructionMemory,
    /// Per-crossbar input register files.
    pub xb_in_mem: Vec<XbarInputMemory>,
    /// Per-crossbar output register files.
    pub xb_out_mem: Vec<XbarOutputMemory>,

    /// Per-crossbar DAC arrays.
    pub dac_arrays: Vec<DacArray>,
    /// The crossbars.
    pub xbars: Vec<Crossbar>,
    /// Per-crossbar sample-and-hold banks.
    pub snh_units: Vec<SampleHold>,
    /// First mux stage (one per crossbar, lane fan-in).
    pub mux1: Vec<Mux>,
    /// Second mux stage (one per ADC, crossbar fan-in).
    pub mux2: Vec<Mux>,
    /// The ADCs.
    pub adcs: Vec<Adc>,
    /// The shared scalar ALU.
    pub alu: Alu,

    /// Interface to the external memory hierarchy.
    pub mem_interface: MemInterface,

    /// Next program counter value.
    pub pc: Addr,
    /// Fetch → decode latch.
    pub fd: FetchDecode,
    /// Decode → execute latch.
    pub de: DecodeExecute,
    /// Per-stage bookkeeping, in pipeline order.
    pub stages: [StageState; NUM_STAGES],
    /// One-shot flag: the in-flight `ld` has already written its bank.
    pub ld_access_done: bool,
    /// Monotonic halt flag; set by `hlt` or when the pipeline drains past
    /// the end of the program.
    pub halt: bool,

    /// Run statistics.
    pub stats: SimStats,
}

impl Ima {
    /// Builds a core from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when the parameter combination is
    /// invalid.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;

        let g = &config.geometry;
        let d = &config.datapath;
        let m = &config.memory;
        let f = &config.format;

        let xb_in_mem = (0..g.num_xbar)
            .map(|_| XbarInputMemory::new(g.xbar_size, d.mem_lat))
            .collect();
        let xb_out_mem = (0..g.num_xbar)
            .map(|_| XbarOutputMemory::new(g.xbar_size, d.mem_lat))
            .collect();
        let dac_arrays = (0..g.num_xbar)
            .map(|_| DacArray::new(g.dac_res, d.dac_lat))
            .collect();
        let xbars = (0..g.num_xbar)
            .map(|_| Crossbar::new(g.xbar_size, d.xbar_lat))
            .collect();
        let snh_units = (0..g.num_xbar)
            .map(|_| SampleHold::new(d.snh_lat))
            .collect();
        let mux1 = (0..g.num_xbar)
            .map(|_| Mux::new(g.xbar_size, d.mux_lat))
            .collect();
        let mux2 = (0..g.num_adc)
            .map(|_| Mux::new(config.mux2_fan_in(), d.mux_lat))
            .collect();
        let adcs = (0..g.num_adc)
            .map(|_| Adc::new(g.adc_res, d.adc_lat))
            .collect();

        let data_mem = DataMemory::new(m.data_mem_size, config.xbar_window(), d.mem_lat);
        let instrn_mem = InstructionMemory::new(m.instrn_mem_size, d.mem_lat);
        let alu = Alu::new(f.data_width, f.frac_bits, d.alu_lat);
        let mem_interface = MemInterface::new(m.mem_interface_lat, m.ext_mem_size);

        Ok(Self {
            data_mem,
            instrn_mem,
            xb_in_mem,
            xb_out_mem,
            dac_arrays,
            xbars,
            snh_units,
            mux1,
            mux2,
            adcs,
            alu,
            mem_interface,
            pc: 0,
            fd: FetchDecode::default(),
            de: DecodeExecute::default(),
            stages: StageState::reset_all(),
            ld_access_done: false,
            halt: false,
            stats: SimStats::new(),
            config,
        })
    }

    /// Loads a program into instruction memory and resets pipeline state.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ProgramTooLarge`] when the program exceeds the
    /// instruction memory capacity.
    pub fn load_program(&mut self, program: Vec<Instruction>) -> Result<(), SimError> {
        self.instrn_mem.load(program)?;
        self.pc = 0;
        self.fd = FetchDecode::default();
        self.de = DecodeExecute::default();
        self.stages = StageState::reset_all();
        self.ld_access_done = false;
        self.halt = false;
        self.stats = SimStats::new();
        Ok(())
    }

    /// Resolves a unified register-space address.
    ///
    /// Total and deterministic: every address below the crossbar window maps
    /// to exactly one (crossbar, lane) pair; everything else is data memory.
    pub const fn resolve(&self, addr: Addr) -> RegisterRef {
        let window = self.config.xbar_window();
        if addr < window {
            RegisterRef::XbarLane {
                xb: addr / self.config.geometry.xbar_size,
                lane: addr % self.config.geometry.xbar_size,
            }
        } else {
            RegisterRef::Data(addr)
        }
    }

    /// Reads an operand through the unified mapping.
    ///
    /// Crossbar-window addresses read the *output* registers (the side
    /// visible to scalar code); data addresses read data memory.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when the resolved bank rejects
    /// the access.
    pub fn read_operand(&self, addr: Addr) -> Result<Word, SimError> {
        match self.resolve(addr) {
            RegisterRef::XbarLane { xb, lane } => self.xb_out_mem[xb].read(lane),
            RegisterRef::Data(a) => self.data_mem.read(a),
        }
    }

    /// Advances the core by one clock cycle.
    ///
    /// Ticks the memory interface first so a completing access is observable
    /// by this cycle's stage pass, then runs the reverse-order pipeline
    /// protocol.
    ///
    /// # Errors
    ///
    /// Propagates fatal stage errors; see [`pipeline::step`].
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.mem_interface.tick()?;
        pipeline::step(self)?;
        // Fetch stops at the end-of-program sentinel; once every stage has
        // drained there is nothing left to retire.
        if !self.halt && self.stages.iter().all(|s| s.empty) {
            tracing::debug!(
                target: "ima::pipeline",
                core_id = self.config.general.core_id,
                "pipeline drained, halting"
            );
            self.halt = true;
        }
        self.stats.cycles += 1;
        Ok(())
    }

    /// Captures the per-cycle trace snapshot.
    pub fn snapshot(&self, cycle: u64) -> CycleSnapshot {
        let flags = |s: &StageState| StageFlags {
            empty: s.empty,
            done: s.done,
            cycle: s.cycle,
        };
        CycleSnapshot {
            cycle,
            core_id: self.config.general.core_id,
            pc: self.pc,
            stages: [
                flags(&self.stages[0]),
                flags(&self.stages[1]),
                flags(&self.stages[2]),
            ],
            decode_instrn: self.fd.instrn.as_ref().map(ToString::to_string),
            execute_instrn: self.de.instrn.as_ref().map(ToString::to_string),
            halted: self.halt,
        }
    }
}
