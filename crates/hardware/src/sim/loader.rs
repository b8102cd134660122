//! Program loader.
//!
//! This module reads pre-assembled instruction streams from disk. A program
//! file is a JSON array of tagged instruction records:
//!
//! ```json
//! [
//!     { "op": "ld", "dest": 0, "addr": 4 },
//!     { "op": "alui", "aluop": "add", "dest": 24, "r1": 25, "imm": 3 },
//!     { "op": "hlt" }
//! ]
//! ```
//!
//! Capacity checking happens when the program is loaded into instruction
//! memory, not here.

use std::fs;
use std::path::Path;

use crate::common::SimError;
use crate::isa::Instruction;

/// Reads a JSON program file.
///
/// # Errors
///
/// Returns [`SimError::Io`] when the file cannot be read and
/// [`SimError::Parse`] when it is not a valid instruction array.
pub fn load_program_file(path: &Path) -> Result<Vec<Instruction>, SimError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Parses a JSON program from a string.
///
/// # Errors
///
/// Returns [`SimError::Parse`] when the string is not a valid instruction
/// array.
pub fn parse_program(json: &str) -> Result<Vec<Instruction>, SimError> {
    Ok(serde_json::from_str(json)?)
}
