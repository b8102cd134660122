//! Fixed-latency storage banks.
//!
//! This module implements the four bank types of the core:
//! 1. **`DataMemory`:** Scalar words, addressed by the unified address space
//!    above the crossbar register window (re-based internally).
//! 2. **`InstructionMemory`:** Bulk-loaded once; fetching past the program
//!    returns the end-of-program sentinel (`None`).
//! 3. **`XbarInputMemory`:** Operand words plus the bit-slice reads the MVM
//!    chain streams through the DAC.
//! 4. **`XbarOutputMemory`:** Accumulator lanes with `reset`/`restart` and a
//!    sequential write pointer, matching the shift-and-accumulate drain loop.
//!
//! All banks reject out-of-range addresses with a fatal [`SimError`]; a
//! well-formed configuration never produces one at run time.

use crate::common::{Addr, SimError, Word};
use crate::isa::Instruction;

/// Scalar data memory.
///
/// Lives at the top of the unified address space: the bank subtracts its
/// `base` (the crossbar register window size) from every incoming address.
#[derive(Debug)]
pub struct DataMemory {
    words: Vec<Word>,
    base: Addr,
    latency: u64,
}

impl DataMemory {
    /// Creates a zero-filled data memory of `capacity` words.
    ///
    /// `base` is the unified address of word 0, i.e. `num_xbar * xbar_size`.
    pub fn new(capacity: usize, base: Addr, latency: u64) -> Self {
        Self {
            words: vec![0; capacity],
            base,
            latency,
        }
    }

    /// Access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Reads the word at a unified address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `addr` is below the bank
    /// base or past its capacity.
    pub fn read(&self, addr: Addr) -> Result<Word, SimError> {
        self.index(addr).map(|i| self.words[i])
    }

    /// Writes the word at a unified address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `addr` is below the bank
    /// base or past its capacity.
    pub fn write(&mut self, addr: Addr, value: Word) -> Result<(), SimError> {
        let i = self.index(addr)?;
        self.words[i] = value;
        Ok(())
    }

    /// Resolves a unified address to a bank-local index.
    fn index(&self, addr: Addr) -> Result<usize, SimError> {
        let local = addr.checked_sub(self.base).ok_or(SimError::AddressOutOfRange {
            bank: "data memory",
            addr,
            capacity: self.words.len(),
        })?;
        if local >= self.words.len() {
            return Err(SimError::AddressOutOfRange {
                bank: "data memory",
                addr,
                capacity: self.words.len(),
            });
        }
        Ok(local)
    }
}

/// Instruction memory.
///
/// Holds the pre-assembled program; loaded once, then read-only.
#[derive(Debug)]
pub struct InstructionMemory {
    entries: Vec<Instruction>,
    capacity: usize,
    latency: u64,
}

impl InstructionMemory {
    /// Creates an empty instruction memory of `capacity` instructions.
    pub const fn new(capacity: usize, latency: u64) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            latency,
        }
    }

    /// Access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Number of instructions currently loaded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no program is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bulk-loads a program, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ProgramTooLarge`] when the program exceeds the
    /// configured capacity.
    pub fn load(&mut self, program: Vec<Instruction>) -> Result<(), SimError> {
        if program.len() > self.capacity {
            return Err(SimError::ProgramTooLarge {
                len: program.len(),
                capacity: self.capacity,
            });
        }
        self.entries = program;
        Ok(())
    }

    /// Fetches the instruction at `pc`.
    ///
    /// `None` is the end-of-program sentinel: the pc has run past the loaded
    /// program.
    pub fn fetch(&self, pc: Addr) -> Option<Instruction> {
        self.entries.get(pc).cloned()
    }
}

/// Per-crossbar input register file.
///
/// Holds one operand word per crossbar row. The MVM chain reads it one
/// `dac_res`-bit slice at a time, least-significant slice first.
#[derive(Debug)]
pub struct XbarInputMemory {
    words: Vec<Word>,
    latency: u64,
}

impl XbarInputMemory {
    /// Creates a zero-filled input register file with `xbar_size` lanes.
    pub fn new(xbar_size: usize, latency: u64) -> Self {
        Self {
            words: vec![0; xbar_size],
            latency,
        }
    }

    /// Access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Reads the full word of one lane.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `lane` is past the
    /// crossbar size.
    pub fn read(&self, lane: Addr) -> Result<Word, SimError> {
        self.words
            .get(lane)
            .copied()
            .ok_or(SimError::AddressOutOfRange {
                bank: "xbar input register",
                addr: lane,
                capacity: self.words.len(),
            })
    }

    /// Writes the full word of one lane.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `lane` is past the
    /// crossbar size.
    pub fn write(&mut self, lane: Addr, value: Word) -> Result<(), SimError> {
        let capacity = self.words.len();
        let slot = self
            .words
            .get_mut(lane)
            .ok_or(SimError::AddressOutOfRange {
                bank: "xbar input register",
                addr: lane,
                capacity,
            })?;
        *slot = value;
        Ok(())
    }

    /// Reads the `slice`-th `dac_res`-bit field of one lane.
    ///
    /// Slice 0 covers the least-significant bits. This is the bit-serial read
    /// the DAC streams during an MVM pass; it does not mutate the register.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `lane` is past the
    /// crossbar size.
    pub fn read_slice(&self, lane: Addr, slice: u32, dac_res: u32) -> Result<Word, SimError> {
        let word = self.read(lane)?;
        let mask = (1i64 << dac_res) - 1;
        Ok((word >> (slice * dac_res)) & mask)
    }
}

/// Per-crossbar output register file.
///
/// Accumulates the shift-and-add partial sums of an MVM. Alongside the
/// random (lane-indexed) accessors, a pair of sequential pointers walk the
/// lanes the way the drain loop does; [`XbarOutputMemory::restart`] rewinds
/// them after each bit-serial pass.
#[derive(Debug)]
pub struct XbarOutputMemory {
    words: Vec<Word>,
    read_ptr: usize,
    write_ptr: usize,
    latency: u64,
}

impl XbarOutputMemory {
    /// Creates a zero-filled output register file with `xbar_size` lanes.
    pub fn new(xbar_size: usize, latency: u64) -> Self {
        Self {
            words: vec![0; xbar_size],
            read_ptr: 0,
            write_ptr: 0,
            latency,
        }
    }

    /// Access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Zeroes every lane and rewinds both sequential pointers.
    ///
    /// Called once before an MVM starts accumulating into this crossbar.
    pub fn reset(&mut self) {
        self.words.fill(0);
        self.read_ptr = 0;
        self.write_ptr = 0;
    }

    /// Rewinds the sequential pointers without clearing the lanes.
    ///
    /// Called after each bit-serial pass so the next pass re-walks the lanes.
    pub fn restart(&mut self) {
        self.read_ptr = 0;
        self.write_ptr = 0;
    }

    /// Reads one lane.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `lane` is past the
    /// crossbar size.
    pub fn read(&self, lane: Addr) -> Result<Word, SimError> {
        self.words
            .get(lane)
            .copied()
            .ok_or(SimError::AddressOutOfRange {
                bank: "xbar output register",
                addr: lane,
                capacity: self.words.len(),
            })
    }

    /// Writes one lane directly.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `lane` is past the
    /// crossbar size.
    pub fn write(&mut self, lane: Addr, value: Word) -> Result<(), SimError> {
        let capacity = self.words.len();
        let slot = self
            .words
            .get_mut(lane)
            .ok_or(SimError::AddressOutOfRange {
                bank: "xbar output register",
                addr: lane,
                capacity,
            })?;
        *slot = value;
        Ok(())
    }

    /// Reads the lane under the sequential read pointer and advances it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when the pointer has walked
    /// past the last lane without a `restart`.
    pub fn read_next(&mut self) -> Result<Word, SimError> {
        let value = self.read(self.read_ptr)?;
        self.read_ptr += 1;
        Ok(value)
    }

    /// Writes the lane under the sequential write pointer and advances it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when the pointer has walked
    /// past the last lane without a `restart`.
    pub fn write_next(&mut self, value: Word) -> Result<(), SimError> {
        self.write(self.write_ptr, value)?;
        self.write_ptr += 1;
        Ok(())
    }
}
