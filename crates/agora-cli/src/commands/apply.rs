// crates/agora-cli/src/commands/apply.rs
//
// `agora apply <file>`: deliver the commands in a JSON transaction file, one
// block per command, and persist the resulting state.

use std::fs;

use clap::Args;

use agora_app::MsgResponse;

use crate::config::{expand_tilde, CliConfig};
use crate::state::{LocalState, TxFile};

#[derive(Debug, Args)]
pub struct ApplyCmd {
    /// Path to a JSON file holding one `{ "time", "msg" }` object or a list of them.
    #[arg()]
    pub file: String,
}

pub fn run(cmd: &ApplyCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state_path = config.state_path();
    let mut state = LocalState::load(&state_path)?;
    let mut app = state.to_app()?;

    let txs: TxFile = serde_json::from_str(&fs::read_to_string(expand_tilde(&cmd.file))?)?;
    let txs = txs.into_txs();
    let mut rejected = 0usize;
    for tx in &txs {
        let block = state.next_block(tx.time);
        app.begin_block(&block);
        match app.deliver(block, &tx.msg) {
            Ok(response) => print_response(block.height, &response)?,
            Err(err) => {
                rejected += 1;
                println!("block {}: rejected ({:?}): {}", block.height, err.kind(), err);
            }
        }
        state.height = block.height;
        state.time = block.time;
    }

    state.app = app.export_genesis();
    state.save(&state_path)?;
    tracing::info!(height = state.height, applied = txs.len() - rejected, rejected, "state saved");

    if rejected > 0 {
        return Err(format!("{} of {} commands rejected", rejected, txs.len()).into());
    }
    Ok(())
}

fn print_response(height: u64, response: &MsgResponse) -> Result<(), Box<dyn std::error::Error>> {
    println!("block {}: {}", height, serde_json::to_string_pretty(response)?);
    Ok(())
}
