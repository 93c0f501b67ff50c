use clap::Subcommand;
use std::error::Error;
use std::path::Path;
use thiserror::Error;

pub mod decode;
pub mod remap;

/// Errors that can occur while running a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// File read error.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
    /// Failed to parse the index map JSON.
    #[error("index map parse error: {0}")]
    Map(#[from] serde_json::Error),
    /// The instruction stream could not be decoded or re-encoded.
    #[error("stream error: {0}")]
    Stream(#[from] dexmorph_core::Error),
    /// The remapping transform failed.
    #[error("transform error: {0}")]
    Transform(#[from] dexmorph_transforms::Error),
}

/// Trait implemented by every subcommand.
pub trait Command {
    /// Executes the subcommand.
    fn execute(self) -> Result<(), Box<dyn Error>>;
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Cmd {
    /// Decode an instruction stream into a listing
    Decode(decode::DecodeArgs),
    /// Remap constant-pool indices in an instruction stream
    Remap(remap::RemapArgs),
}

impl Command for Cmd {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Decode(args) => args.execute(),
            Cmd::Remap(args) => args.execute(),
        }
    }
}

/// Loads an instruction stream from a hex string or a file holding one.
pub(crate) fn load_code_units(input: &str) -> Result<Vec<u16>, CliError> {
    let is_file = !input.starts_with("0x") && Path::new(input).is_file();
    let hex = if is_file {
        std::fs::read_to_string(input)?
    } else {
        input.to_string()
    };
    Ok(dexmorph_core::code_units_from_hex(&hex)?)
}
