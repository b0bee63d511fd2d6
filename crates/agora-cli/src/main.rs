// crates/agora-cli/src/main.rs
//
// CLI entrypoint for the Agora argument economy.
//
// Keeps a local chain state file under the configured data directory and
// provides subcommands to initialize it, apply commands, run queries, export
// genesis, check invariants, and manage keys.

mod commands;
mod config;
mod state;

use clap::{Parser, Subcommand};
use commands::apply::ApplyCmd;
use commands::export::ExportCmd;
use commands::init::InitCmd;
use commands::keys::KeysCmd;
use commands::query::QueryCmd;
use config::CliConfig;

/// Agora CLI: local harness for the argument staking economy.
#[derive(Parser, Debug)]
#[command(name = "agora", version = "0.1.0", about = "Agora argument economy CLI")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.agora/config.toml")]
    config: String,

    /// Override the data directory from the config file.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the local state from a genesis document or flags.
    Init(InitCmd),

    /// Deliver the commands in a transaction file.
    Apply(ApplyCmd),

    /// Run a read-only query.
    Query(QueryCmd),

    /// Export the current state as a genesis document.
    Export(ExportCmd),

    /// Verify cross-module invariants on the local state.
    Check,

    /// Key management: generate, show.
    #[command(subcommand)]
    Keys(KeysCmd),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = CliConfig::load(&cli.config);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Ok(_) => tracing::debug!("Loaded configuration from {}", cli.config),
        Err(e) => tracing::warn!("Could not load config from {}: {}. Using defaults.", cli.config, e),
    }
    tracing::debug!("Data directory: {}", config.data_dir().display());

    match &cli.command {
        Commands::Init(cmd) => commands::init::run(cmd, &config)?,
        Commands::Apply(cmd) => commands::apply::run(cmd, &config)?,
        Commands::Query(cmd) => commands::query::run(cmd, &config)?,
        Commands::Export(cmd) => commands::export::run(cmd, &config)?,
        Commands::Check => commands::check::run(&config)?,
        Commands::Keys(cmd) => commands::keys::run(cmd, &config)?,
    }

    Ok(())
}
