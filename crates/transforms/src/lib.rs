//! Index-remapping transforms over decoded Dalvik instruction streams.
//!
//! The one transform this crate ships rewrites every constant-pool reference
//! embedded in a method body from one pool numbering to another, substituting
//! the wide string-load opcode when a translated index outgrows the compact
//! form. See [`transformer::InstructionTransformer`].

pub mod index_map;
pub mod transformer;

pub use index_map::{HashIndexMap, IdentityIndexMap, IndexMap};
pub use transformer::{promote_string_load, InstructionTransformer, RemappingVisitor};

use thiserror::Error;

/// Transform error type encompassing all transform module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Decoding or re-encoding the instruction stream failed.
    #[error("malformed instruction stream: {0}")]
    Stream(#[from] dexmorph_core::Error),
}

/// Transform result type
pub type Result<T> = std::result::Result<T, Error>;
