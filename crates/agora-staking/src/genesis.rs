// crates/agora-staking/src/genesis.rs
//
// Import and export of staking state.
//
// Validation here covers what the staking engine alone can check: params,
// id uniqueness, stake -> argument references, and per-argument totals.
// Cross-module checks (claims exist, claim totals match) live in the app.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::{Coin, ParamSubspace, STAKE_DENOM};

use crate::keeper::StakingKeeper;
use crate::params::{Params, MODULE_NAME};
use crate::types::{Argument, Stake, UserEarnedCoins};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub stakes: Vec<Stake>,
    #[serde(default)]
    pub users_earnings: Vec<UserEarnedCoins>,
    #[serde(default)]
    pub params: Params,
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), AgoraError> {
        self.params.validate()?;

        let mut totals: BTreeMap<u64, Coin> = BTreeMap::new();
        for argument in &self.arguments {
            if totals.insert(argument.id, Coin::zero(STAKE_DENOM)).is_some() {
                return Err(duplicate("argument", argument.id));
            }
        }

        let mut stake_ids = BTreeSet::new();
        for stake in &self.stakes {
            if !stake_ids.insert(stake.id) {
                return Err(duplicate("stake", stake.id));
            }
            let total = totals.get_mut(&stake.argument_id).ok_or_else(|| {
                AgoraError::InvariantViolation(format!(
                    "stake {} references unknown argument {}",
                    stake.id, stake.argument_id
                ))
            })?;
            if stake.is_live() {
                *total = total.checked_add(&stake.amount)?;
            }
        }

        for argument in &self.arguments {
            let live = &totals[&argument.id];
            if *live != argument.total_stake {
                return Err(AgoraError::InvariantViolation(format!(
                    "argument {} total stake {} does not match live stakes {}",
                    argument.id, argument.total_stake, live
                )));
            }
        }

        let mut earners = BTreeSet::new();
        for earnings in &self.users_earnings {
            if !earners.insert(earnings.address) {
                return Err(AgoraError::InvariantViolation(format!(
                    "duplicate earnings entry for {}",
                    earnings.address
                )));
            }
        }
        Ok(())
    }
}

fn duplicate(what: &str, id: u64) -> AgoraError {
    AgoraError::InvariantViolation(format!("duplicate {} id {} in genesis", what, id))
}

impl StakingKeeper {
    /// Rebuild a keeper from exported state. Id counters resume after the
    /// highest imported id.
    pub fn import_genesis(genesis: &GenesisState) -> Result<Self, AgoraError> {
        genesis.validate()?;
        let mut keeper = StakingKeeper {
            params: ParamSubspace::new(MODULE_NAME, genesis.params.clone()),
            ..StakingKeeper::default()
        };
        for argument in &genesis.arguments {
            keeper.arguments.insert(argument.id, argument.clone());
            keeper.next_argument_id = keeper.next_argument_id.max(argument.id + 1);
        }
        // Submission order within a claim follows argument id.
        for argument in keeper.arguments.values() {
            keeper
                .claim_arguments
                .entry(argument.claim_id)
                .or_default()
                .push(argument.id);
        }
        for stake in &genesis.stakes {
            keeper.stakes.insert(stake.id, stake.clone());
            keeper.next_stake_id = keeper.next_stake_id.max(stake.id + 1);
        }
        for earnings in &genesis.users_earnings {
            keeper.earned.insert(earnings.address, earnings.coins.clone());
        }
        tracing::info!(
            arguments = keeper.arguments.len(),
            stakes = keeper.stakes.len(),
            "staking genesis imported"
        );
        Ok(keeper)
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            arguments: self.arguments(),
            stakes: self.stakes(),
            users_earnings: self.users_earnings(),
            params: self.params().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestEnv, BODY, SUMMARY};
    use crate::types::Stance;
    use chrono::Duration;

    fn populated() -> TestEnv {
        let mut env = TestEnv::new();
        let creator = env.funded_user(100);
        let voter = env.funded_user(100);
        let claim_id = env.claim_id;
        {
            let (keeper, mut ctx) = env.parts();
            let argument = keeper
                .submit_argument(&mut ctx, BODY, SUMMARY, creator, claim_id, Stance::Backing)
                .unwrap();
            keeper.submit_upvote(&mut ctx, argument.id, voter).unwrap();
        }
        env.advance(Duration::days(7));
        let (keeper, mut ctx) = env.parts();
        keeper.withdraw_stake(&mut ctx, 2, voter).unwrap();
        env
    }

    #[test]
    fn test_default_genesis_is_valid() {
        GenesisState::default().validate().unwrap();
    }

    #[test]
    fn test_export_import_roundtrip() {
        let env = populated();
        let genesis = env.keeper.export_genesis();
        let restored = StakingKeeper::import_genesis(&genesis).unwrap();
        assert_eq!(restored.export_genesis(), genesis);
        assert_eq!(restored.claim_arguments(env.claim_id).len(), 1);
        assert_eq!(restored.next_stake_id, 3);
        assert_eq!(restored.next_argument_id, 2);
    }

    #[test]
    fn test_genesis_json_roundtrip() {
        let env = populated();
        let genesis = env.keeper.export_genesis();
        let json = serde_json::to_string(&genesis).unwrap();
        let back: GenesisState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, genesis);
    }

    #[test]
    fn test_rejects_mismatched_argument_total() {
        let env = populated();
        let mut genesis = env.keeper.export_genesis();
        genesis.arguments[0].total_stake = Coin::tokens(1);
        assert!(matches!(genesis.validate(), Err(AgoraError::InvariantViolation(_))));
    }

    #[test]
    fn test_rejects_dangling_stake() {
        let env = populated();
        let mut genesis = env.keeper.export_genesis();
        genesis.stakes[0].argument_id = 42;
        assert!(genesis.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let env = populated();
        let mut genesis = env.keeper.export_genesis();
        let dup = genesis.stakes[0].clone();
        genesis.stakes.push(dup);
        assert!(genesis.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut genesis = GenesisState::default();
        genesis.params.period_secs = 0;
        assert!(matches!(genesis.validate(), Err(AgoraError::InvalidParams(_))));
    }
}
