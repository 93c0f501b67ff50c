//! Core instruction-format library for dexmorph: opcode classification, the
//! decoded instruction model, and the code-unit reader and writer.
//!
//! A method body is a flat stream of 16-bit code units. [`reader::read_insns`]
//! walks it front to back, dispatching one [`DecodedInsn`] per instruction to
//! an [`InsnVisitor`]; [`writer::InsnWriter`] is the visitor that re-encodes
//! events into a fresh stream. Transforms sit between the two.

pub mod cursor;
pub mod insn;
pub mod opcode;
pub mod reader;
pub mod result;
pub mod writer;

pub use cursor::{CodeInput, CodeOutput};
pub use insn::{CollectingVisitor, DecodedInsn, InsnFields, InsnVisitor};
pub use opcode::{IndexKind, InsnFormat};
pub use result::{Error, Result};

/// Converts a little-endian byte buffer into 16-bit code units.
///
/// Fails when the buffer does not hold a whole number of units.
pub fn code_units_from_bytes(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::OddByteLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Converts code units back into their little-endian byte representation.
pub fn code_units_to_bytes(units: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(units.len() * 2);
    for unit in units {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// Parses a hex string (with or without a `0x` prefix) into code units.
pub fn code_units_from_hex(input: &str) -> Result<Vec<u16>> {
    let bytes = hex::decode(input.trim().trim_start_matches("0x"))?;
    code_units_from_bytes(&bytes)
}

/// Renders code units as a hex string without a prefix.
pub fn code_units_to_hex(units: &[u16]) -> String {
    hex::encode(code_units_to_bytes(units))
}
