// crates/agora-slashing/src/genesis.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::ParamSubspace;

use crate::keeper::SlashingKeeper;
use crate::params::{Params, MODULE_NAME};
use crate::types::Slash;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub slashes: Vec<Slash>,
}

impl GenesisState {
    /// Params and id uniqueness. Argument references are checked by the app,
    /// which can see the staking state.
    pub fn validate(&self) -> Result<(), AgoraError> {
        self.params.validate()?;
        let mut ids = BTreeSet::new();
        let mut triples = BTreeSet::new();
        for slash in &self.slashes {
            if !ids.insert(slash.id) {
                return Err(AgoraError::InvariantViolation(format!(
                    "duplicate slash id {} in genesis",
                    slash.id
                )));
            }
            if !triples.insert((slash.creator, slash.argument_id, slash.slash_type as u8)) {
                return Err(AgoraError::InvariantViolation(format!(
                    "slash {} duplicates an earlier slash by {} on argument {}",
                    slash.id, slash.creator, slash.argument_id
                )));
            }
        }
        Ok(())
    }
}

impl SlashingKeeper {
    pub fn import_genesis(genesis: &GenesisState) -> Result<Self, AgoraError> {
        genesis.validate()?;
        let mut keeper = SlashingKeeper {
            params: ParamSubspace::new(MODULE_NAME, genesis.params.clone()),
            ..SlashingKeeper::default()
        };
        for slash in &genesis.slashes {
            keeper.slashes.insert(slash.id, slash.clone());
            keeper.next_slash_id = keeper.next_slash_id.max(slash.id + 1);
        }
        tracing::info!(slashes = keeper.slashes.len(), "slashing genesis imported");
        Ok(keeper)
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            params: self.params().clone(),
            slashes: self.slashes(),
        }
    }
}
