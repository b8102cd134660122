//! # Unit Components
//!
//! This module serves as the central hub for the unit tests of the simulated
//! core, organized to mirror the library's module layout.





/// Unit tests for the fixed-point and bit-string conversion helpers.
pub mod numeric;

/// End-to-end simulation scenarios through the driver loop.
pub mod sim;

/// Unit tests for statistics accounting and reporting.
pub mod stats;
