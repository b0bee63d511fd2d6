// crates/agora-app/src/genesis.rs
//
// Full-app genesis document.
//
// Totals are part of the snapshot and are never re-derived on import. Instead
// `validate` checks them against the constituent stakes:
//   - every argument references a known claim
//   - every slash references a known argument
//   - claim.total_backed / total_challenged == live stakes on the claim's
//     backing / challenging arguments
// Per-module checks (params, unique ids, argument totals) run first.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::{Coin, STAKE_DENOM};
use agora_staking::Stance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppGenesis {
    pub genesis_time: DateTime<Utc>,
    #[serde(default)]
    pub bank: agora_bank::bank::GenesisState,
    #[serde(default)]
    pub accounts: agora_bank::accounts::GenesisState,
    #[serde(default)]
    pub claim: agora_claim::GenesisState,
    #[serde(default)]
    pub staking: agora_staking::GenesisState,
    #[serde(default)]
    pub slashing: agora_slashing::GenesisState,
}

impl AppGenesis {
    /// Empty state with default params.
    pub fn new(genesis_time: DateTime<Utc>) -> Self {
        Self {
            genesis_time,
            bank: Default::default(),
            accounts: Default::default(),
            claim: Default::default(),
            staking: Default::default(),
            slashing: Default::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AgoraError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, AgoraError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), AgoraError> {
        self.staking.validate()?;
        self.slashing.validate()?;

        let mut claim_totals: BTreeMap<u64, (Coin, Coin)> = BTreeMap::new();
        for claim in &self.claim.claims {
            let zero = (Coin::zero(STAKE_DENOM), Coin::zero(STAKE_DENOM));
            if claim_totals.insert(claim.id, zero).is_some() {
                return Err(AgoraError::InvariantViolation(format!(
                    "duplicate claim id {} in genesis",
                    claim.id
                )));
            }
        }

        let mut stance_of = BTreeMap::new();
        for argument in &self.staking.arguments {
            if !claim_totals.contains_key(&argument.claim_id) {
                return Err(AgoraError::InvariantViolation(format!(
                    "argument {} references unknown claim {}",
                    argument.id, argument.claim_id
                )));
            }
            stance_of.insert(argument.id, (argument.claim_id, argument.stake_type));
        }

        for stake in self.staking.stakes.iter().filter(|s| s.is_live()) {
            // Staking validation guarantees the argument exists.
            let Some((claim_id, stance)) = stance_of.get(&stake.argument_id) else {
                continue;
            };
            if let Some((backed, challenged)) = claim_totals.get_mut(claim_id) {
                match stance {
                    Stance::Backing => *backed = backed.checked_add(&stake.amount)?,
                    Stance::Challenge => *challenged = challenged.checked_add(&stake.amount)?,
                }
            }
        }

        for claim in &self.claim.claims {
            let (backed, challenged) = &claim_totals[&claim.id];
            if claim.total_backed != *backed || claim.total_challenged != *challenged {
                return Err(AgoraError::InvariantViolation(format!(
                    "claim {} totals {}/{} do not match live stakes {}/{}",
                    claim.id, claim.total_backed, claim.total_challenged, backed, challenged
                )));
            }
        }

        let argument_ids: BTreeSet<u64> = stance_of.keys().copied().collect();
        for slash in &self.slashing.slashes {
            if !argument_ids.contains(&slash.argument_id) {
                return Err(AgoraError::InvariantViolation(format!(
                    "slash {} references unknown argument {}",
                    slash.id, slash.argument_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{Address, Claim};

    #[test]
    fn test_empty_genesis_is_valid() {
        AppGenesis::new(Utc::now()).validate().unwrap();
    }

    #[test]
    fn test_claim_totals_must_match_stakes() {
        let mut genesis = AppGenesis::new(Utc::now());
        let mut claim = Claim::new(1, "crypto", "body", Address::random(), "", Utc::now());
        claim.total_backed = Coin::tokens(5);
        genesis.claim.claims.push(claim);
        assert!(matches!(genesis.validate(), Err(AgoraError::InvariantViolation(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut genesis = AppGenesis::new(Utc::now());
        genesis
            .claim
            .claims
            .push(Claim::new(1, "crypto", "body", Address::random(), "", Utc::now()));
        let json = genesis.to_json().unwrap();
        assert_eq!(AppGenesis::from_json(&json).unwrap(), genesis);
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = AppGenesis::from_json("{not json").unwrap_err();
        assert!(matches!(err, AgoraError::Serialization(_)));
    }
}
