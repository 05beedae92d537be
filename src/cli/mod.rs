use crate::errors::AppResult;
use clap::{Parser, Subcommand};
use tracing_subscriber;

pub mod commands;

/// Bitcoin chainstate UTXO dump
#[derive(Parser)]
#[command(name = "chainstate-dump")]
#[command(about = "Decode Bitcoin Core's chainstate LevelDB into a list of unspent outputs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Dump every unspent output to CSV or JSON lines
    Dump(commands::dump::DumpCommand),
    /// Decode a single raw key/value pair given as hex
    Decode(commands::decode::DecodeCommand),
    /// Show the obfuscation key and best block of a chainstate
    Inspect(commands::inspect::InspectCommand),
}

pub async fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dump(command) => command.run().await,
        Commands::Decode(command) => command.run(),
        Commands::Inspect(command) => command.run(),
    }
}
