// crates/agora-cli/src/commands/export.rs
//
// `agora export`: write the current state as a genesis document.

use std::fs;

use clap::Args;

use crate::config::{expand_tilde, CliConfig};
use crate::state::LocalState;

#[derive(Debug, Args)]
pub struct ExportCmd {
    /// Output file. Prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run(cmd: &ExportCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = LocalState::load(&config.state_path())?;
    let genesis = state.to_app()?.export_genesis();
    let json = genesis.to_json()?;
    match &cmd.out {
        Some(path) => {
            let path = expand_tilde(path);
            fs::write(&path, json)?;
            println!("Exported genesis at height {} to {}", state.height, path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
