//! The `remap` subcommand: runs the index-remapping transformer over a
//! stream and prints the resulting stream as hex.

use clap::Args;
use dexmorph_core::code_units_to_hex;
use dexmorph_transforms::{HashIndexMap, InstructionTransformer};
use std::error::Error;
use tracing::info;

/// Arguments for the `remap` subcommand.
#[derive(Args)]
pub struct RemapArgs {
    /// Input instruction stream as a hex string (0x...) or a file path
    /// containing one.
    #[arg(short = 'i', long = "input")]
    pub input: String,

    /// Path to a JSON index translation table, e.g.
    /// {"strings": {"3": 2}, "methods": {"5": 6}}.
    #[arg(short = 'm', long = "map")]
    pub map: String,
}

impl super::Command for RemapArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let code = super::load_code_units(&self.input)?;
        let map: HashIndexMap = serde_json::from_str(&std::fs::read_to_string(&self.map)?)?;

        let out = InstructionTransformer::new(&map).transform(&code)?;
        info!(
            "remapped {} code units into {} code units",
            code.len(),
            out.len()
        );
        println!("{}", code_units_to_hex(&out));
        Ok(())
    }
}
