// crates/agora-core/src/context.rs
//
// Execution context for a single command.
//
// The host runtime hands the engines one `Context` per command: the block the
// command executes in, plus mutable access to the external collaborators.
// Engines never hold on to collaborators between commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{AccountKeeper, BankKeeper, ClaimKeeper};

/// Height and timestamp of the block a command executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockInfo {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }
}

pub struct Context<'a> {
    pub block: BlockInfo,
    pub bank: &'a mut dyn BankKeeper,
    pub accounts: &'a mut dyn AccountKeeper,
    pub claims: &'a mut dyn ClaimKeeper,
}

impl<'a> Context<'a> {
    pub fn new(
        block: BlockInfo,
        bank: &'a mut dyn BankKeeper,
        accounts: &'a mut dyn AccountKeeper,
        claims: &'a mut dyn ClaimKeeper,
    ) -> Self {
        Self {
            block,
            bank,
            accounts,
            claims,
        }
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.block.time
    }
}
