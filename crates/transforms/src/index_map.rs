//! Index translation tables.
//!
//! A table is four independent partial functions, one per reference kind,
//! each mapping an old constant-pool index to a new one. Tables are built by
//! an upstream pool diff and consumed read-only here; they are expected to be
//! total over every index the input stream actually references.

use dexmorph_core::IndexKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only index translation table, one lookup per reference kind.
pub trait IndexMap {
    /// Translates a string-pool index.
    fn map_string(&self, index: u32) -> u32;
    /// Translates a type-pool index.
    fn map_type(&self, index: u32) -> u32;
    /// Translates a field-pool index.
    fn map_field(&self, index: u32) -> u32;
    /// Translates a method-pool index.
    fn map_method(&self, index: u32) -> u32;

    /// Dispatches to the lookup for `kind`; `IndexKind::None` is identity.
    fn map(&self, kind: IndexKind, index: u32) -> u32 {
        match kind {
            IndexKind::None => index,
            IndexKind::String => self.map_string(index),
            IndexKind::Type => self.map_type(index),
            IndexKind::Field => self.map_field(index),
            IndexKind::Method => self.map_method(index),
        }
    }
}

/// Table that maps every index to itself, for every kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityIndexMap;

impl IndexMap for IdentityIndexMap {
    fn map_string(&self, index: u32) -> u32 {
        index
    }
    fn map_type(&self, index: u32) -> u32 {
        index
    }
    fn map_field(&self, index: u32) -> u32 {
        index
    }
    fn map_method(&self, index: u32) -> u32 {
        index
    }
}

/// Table backed by four hash maps of explicit overrides.
///
/// An index with no entry translates to itself, so a table only needs to
/// list the indices the pool diff actually moved.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HashIndexMap {
    /// String-pool overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub strings: HashMap<u32, u32>,
    /// Type-pool overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub types: HashMap<u32, u32>,
    /// Field-pool overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<u32, u32>,
    /// Method-pool overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub methods: HashMap<u32, u32>,
}

impl HashIndexMap {
    /// Creates an empty table (behaves like [`IdentityIndexMap`]).
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexMap for HashIndexMap {
    fn map_string(&self, index: u32) -> u32 {
        self.strings.get(&index).copied().unwrap_or(index)
    }
    fn map_type(&self, index: u32) -> u32 {
        self.types.get(&index).copied().unwrap_or(index)
    }
    fn map_field(&self, index: u32) -> u32 {
        self.fields.get(&index).copied().unwrap_or(index)
    }
    fn map_method(&self, index: u32) -> u32 {
        self.methods.get(&index).copied().unwrap_or(index)
    }
}
