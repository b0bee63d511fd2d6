// crates/agora-cli/src/commands/query.rs
//
// `agora query <json>`: run a read-only query against the local state.

use clap::Args;

use agora_app::Query;

use crate::config::CliConfig;
use crate::state::LocalState;

#[derive(Debug, Args)]
pub struct QueryCmd {
    /// The query as JSON, e.g. '{"type": "top_argument", "claim_id": 1}'.
    #[arg()]
    pub query: String,
}

pub fn run(cmd: &QueryCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let query: Query = serde_json::from_str(&cmd.query)?;
    let app = LocalState::load(&config.state_path())?.to_app()?;
    let result = app.query(&query)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
