// crates/agora-cli/src/state.rs
//
// Local chain state persisted between CLI invocations.
//
// The state file is the app's exported genesis plus the block clock, so any
// state file can also be fed back to `agora init --genesis`.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_app::{App, AppGenesis, Msg};
use agora_core::BlockInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    /// Height of the last applied block.
    pub height: u64,
    /// Time of the last applied block.
    pub time: DateTime<Utc>,
    pub app: AppGenesis,
}

impl LocalState {
    pub fn from_app(app: &App, height: u64, time: DateTime<Utc>) -> Self {
        Self {
            height,
            time,
            app: app.export_genesis(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("cannot read state file {}: {}. Run `agora init` first.", path.display(), e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn to_app(&self) -> Result<App, Box<dyn std::error::Error>> {
        Ok(App::from_genesis(&self.app)?)
    }

    /// The block the next command executes in. Block time never runs
    /// backwards.
    pub fn next_block(&self, requested: Option<DateTime<Utc>>) -> BlockInfo {
        let time = requested.map_or(self.time, |t| t.max(self.time));
        BlockInfo::new(self.height + 1, time)
    }
}

/// One command in a transaction file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Block time for the command. Defaults to the last block time.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    pub msg: Msg,
}

/// A transaction file holds one command or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxFile {
    One(Tx),
    Many(Vec<Tx>),
}

impl TxFile {
    pub fn into_txs(self) -> Vec<Tx> {
        match self {
            TxFile::One(tx) => vec![tx],
            TxFile::Many(txs) => txs,
        }
    }
}
