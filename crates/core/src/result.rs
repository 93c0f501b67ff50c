//! Core result and error types.

use thiserror::Error;

/// Core error type encompassing all decode and encode failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to decode a hex string.
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// A reference index does not fit the index field of its instruction format.
    #[error("index {index:#x} does not fit the encoding of opcode {opcode:#04x}")]
    IndexOverflow {
        /// The opcode whose index field overflowed.
        opcode: u8,
        /// The index value that did not fit.
        index: u32,
    },

    /// A switch or array payload is structurally malformed.
    #[error("invalid payload at code unit {offset}: {msg}")]
    InvalidPayload {
        /// Code-unit offset of the payload instruction.
        offset: usize,
        /// Description of the malformation.
        msg: String,
    },

    /// A variable-register instruction carries an impossible register count.
    #[error("invalid register count {count} at code unit {offset}")]
    InvalidRegisterCount {
        /// The decoded register count.
        count: u16,
        /// Code-unit offset of the instruction.
        offset: usize,
    },

    /// A byte buffer does not hold a whole number of 16-bit code units.
    #[error("byte length {0} is not a multiple of 2")]
    OddByteLength(usize),

    /// The stream ended in the middle of an instruction.
    #[error("unexpected end of instruction stream at code unit {offset}")]
    UnexpectedEndOfStream {
        /// Code-unit offset at which the stream ran out.
        offset: usize,
    },

    /// The opcode is not part of the decode table.
    #[error("unrecognized opcode {opcode:#04x} at code unit {offset}")]
    UnrecognizedOpcode {
        /// The raw opcode byte.
        opcode: u8,
        /// Code-unit offset of the instruction.
        offset: usize,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
