use clap::Parser;
use dexmorph_cli::commands::{Cmd, Command};

/// Dexmorph CLI
///
/// Dexmorph rewrites the constant-pool references embedded in a Dalvik
/// method body from one pool numbering to another. It supports decoding an
/// instruction stream to a listing and remapping a stream through an index
/// translation table.
#[derive(Parser)]
#[command(name = "dexmorph")]
#[command(about = "Dexmorph: Dalvik instruction-stream index remapper")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

/// Runs the dexmorph CLI with the provided arguments.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    cli.command.execute()
}
