//! The `decode` subcommand: prints each instruction of a stream with its
//! code-unit offset, operands, and constant-pool reference.

use clap::Args;
use dexmorph_core::reader::read_insns;
use dexmorph_core::{CollectingVisitor, code_units_to_hex};
use std::error::Error;

/// Arguments for the `decode` subcommand.
#[derive(Args)]
pub struct DecodeArgs {
    /// Input instruction stream as a hex string (0x...) or a file path
    /// containing one.
    #[arg(short = 'i', long = "input")]
    pub input: String,
}

impl super::Command for DecodeArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let code = super::load_code_units(&self.input)?;
        let mut collector = CollectingVisitor::default();
        read_insns(&code, &mut collector)?;

        println!("{} code units ({})", code.len(), code_units_to_hex(&code));
        let mut offset = 0usize;
        for insn in &collector.insns {
            println!("{offset:06x}: {insn}");
            offset += insn.code_units();
        }
        Ok(())
    }
}
