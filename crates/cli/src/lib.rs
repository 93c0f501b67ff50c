//! Library surface of the dexmorph CLI; the binary in `main.rs` is a thin
//! wrapper around [`commands`].

pub mod commands;
