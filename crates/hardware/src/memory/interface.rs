//! External memory interface.
//!
//! This module models the request/response protocol between the core and the
//! off-core memory hierarchy:
//! 1. **Single outstanding request:** At most one `ld`/`st` access in flight;
//!    the pipeline's stall protocol prevents overlap.
//! 2. **Countdown completion:** A finite-latency interface completes its own
//!    request after the configured round trip, serving a built-in backing
//!    store.
//! 3. **External completion:** With [`INFINITE_LATENCY`] the interface never
//!    completes by itself; a tile-level controller drives
//!    [`MemInterface::complete_read`]/[`MemInterface::complete_write`].
//!
//! The execute stage polls [`MemInterface::wait`] every cycle instead of
//! assuming a fixed latency.

use crate::common::{Addr, INFINITE_LATENCY, SimError, Word};

/// An in-flight external memory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read one word.
    Read {
        /// External memory address.
        addr: Addr,
    },
    /// Write one word, tagged with the repeat/vector counter of the `st`
    /// instruction.
    Write {
        /// External memory address.
        addr: Addr,
        /// Value to store.
        value: Word,
        /// Repeat/vector counter from the second operand; carried for the
        /// external controller, not interpreted by the core.
        count: Word,
    },
}

/// Interface to the external memory hierarchy.
#[derive(Debug)]
pub struct MemInterface {
    latency: u64,
    /// Backing store served by the countdown path; preloaded by the driver.
    ext_mem: Vec<Word>,
    request: Option<Request>,
    remaining: u64,
    load_value: Word,
    last_write_count: Word,
}

impl MemInterface {
    /// Creates an interface with a zero-filled backing store.
    pub fn new(latency: u64, ext_mem_size: usize) -> Self {
        Self {
            latency,
            ext_mem: vec![0; ext_mem_size],
            request: None,
            remaining: 0,
            load_value: 0,
            last_write_count: 0,
        }
    }

    /// Nominal round-trip latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Whether an access is still outstanding.
    pub const fn wait(&self) -> bool {
        self.request.is_some()
    }

    /// The value delivered by the most recently completed read.
    pub const fn load_value(&self) -> Word {
        self.load_value
    }

    /// The counter carried by the most recently completed write.
    pub const fn last_write_count(&self) -> Word {
        self.last_write_count
    }

    /// Preloads one word of the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `addr` is past the
    /// backing store capacity.
    pub fn preload(&mut self, addr: Addr, value: Word) -> Result<(), SimError> {
        let capacity = self.ext_mem.len();
        let slot = self
            .ext_mem
            .get_mut(addr)
            .ok_or(SimError::AddressOutOfRange {
                bank: "external memory",
                addr,
                capacity,
            })?;
        *slot = value;
        Ok(())
    }

    /// Reads one word of the backing store directly (driver/test inspection).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when `addr` is past the
    /// backing store capacity.
    pub fn inspect(&self, addr: Addr) -> Result<Word, SimError> {
        self.ext_mem
            .get(addr)
            .copied()
            .ok_or(SimError::AddressOutOfRange {
                bank: "external memory",
                addr,
                capacity: self.ext_mem.len(),
            })
    }

    /// Issues a read request.
    ///
    /// A prior outstanding request must have completed; the pipeline's stall
    /// protocol guarantees this. Requests are issued mid-cycle, after this
    /// cycle's [`MemInterface::tick`], so the countdown starts one short of
    /// the nominal latency.
    pub fn read_request(&mut self, addr: Addr) {
        debug_assert!(self.request.is_none(), "overlapping memory requests");
        self.request = Some(Request::Read { addr });
        self.remaining = self.latency.saturating_sub(1);
    }

    /// Issues a write request carrying the repeat/vector counter.
    ///
    /// A prior outstanding request must have completed; the pipeline's stall
    /// protocol guarantees this.
    pub fn write_request(&mut self, addr: Addr, value: Word, count: Word) {
        debug_assert!(self.request.is_none(), "overlapping memory requests");
        self.request = Some(Request::Write { addr, value, count });
        self.remaining = self.latency.saturating_sub(1);
    }

    /// Advances the interface by one cycle.
    ///
    /// Finite-latency requests count down and complete against the backing
    /// store; infinite-latency requests only complete through the external
    /// hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] when a completing request
    /// addresses past the backing store.
    pub fn tick(&mut self) -> Result<(), SimError> {
        if self.request.is_none() || self.latency == INFINITE_LATENCY {
            return Ok(());
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.complete_from_backing()?;
        }
        Ok(())
    }

    /// Completes an outstanding read with externally supplied data.
    ///
    /// The external controller's half of the protocol in infinite-latency
    /// mode.
    pub fn complete_read(&mut self, value: Word) {
        debug_assert!(matches!(self.request, Some(Request::Read { .. })));
        self.load_value = value;
        self.request = None;
    }

    /// Completes an outstanding write acknowledged by the external
    /// controller.
    pub fn complete_write(&mut self) {
        if let Some(Request::Write { count, .. }) = self.request.take() {
            self.last_write_count = count;
        }
    }

    /// Serves the completing request from the built-in backing store.
    fn complete_from_backing(&mut self) -> Result<(), SimError> {
        match self.request.take() {
            Some(Request::Read { addr }) => {
                self.load_value = self
                    .ext_mem
                    .get(addr)
                    .copied()
                    .ok_or(SimError::AddressOutOfRange {
                        bank: "external memory",
                        addr,
                        capacity: self.ext_mem.len(),
                    })?;
            }
            Some(Request::Write { addr, value, count }) => {
                let capacity = self.ext_mem.len();
                let slot = self
                    .ext_mem
                    .get_mut(addr)
                    .ok_or(SimError::AddressOutOfRange {
                        bank: "external memory",
                        addr,
                        capacity,
                    })?;
                *slot = value;
                self.last_write_count = count;
            }
            None => {}
        }
        Ok(())
    }
}
