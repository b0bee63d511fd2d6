// crates/agora-slashing/src/params.rs
//
// Slashing parameters.
//
// Defaults:
//   - Slashes needed to punish an argument: 5
//   - Punishments before the creator is jailed: 50
//   - Slash magnitude: 3x the creator's stake
//   - Earned coins needed to slash (non-admins): 10 AGR
//   - Detailed reason length: 140 characters
//   - Jail duration: 7 days
//   - Slasher reward: 25% of the punished stake

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::{AdminGoverned, AdminSet, Coin, Dec, STAKE_DENOM};

/// Parameter namespace of the slashing engine.
pub const MODULE_NAME: &str = "slashing";

pub const DEFAULT_JAIL_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Slashes of one type on an argument that trigger punishment.
    pub min_slash_count: u64,
    /// Punishments an account may receive before it is jailed.
    pub max_slash_count: u32,
    /// Multiple of the creator's stake they lose when punished.
    pub slash_magnitude: u64,
    pub min_earned_stake_to_slash: Coin,
    pub slash_admins: AdminSet,
    pub max_detailed_reason_length: usize,
    pub jail_duration_secs: u64,
    /// Fraction of the punished stake paid to the slasher.
    pub slasher_reward_share: Dec,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_slash_count: 5,
            max_slash_count: 50,
            slash_magnitude: 3,
            min_earned_stake_to_slash: Coin::tokens(10),
            slash_admins: AdminSet::default(),
            max_detailed_reason_length: 140,
            jail_duration_secs: DEFAULT_JAIL_DURATION_SECS,
            slasher_reward_share: Dec::from_raw(250_000_000_000_000_000),
        }
    }
}

impl AdminGoverned for Params {
    fn admins(&self) -> &AdminSet {
        &self.slash_admins
    }

    fn admins_mut(&mut self) -> &mut AdminSet {
        &mut self.slash_admins
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), AgoraError> {
        if self.min_slash_count < 1 {
            return Err(invalid("min slash count must be positive"));
        }
        if self.max_slash_count < 1 {
            return Err(invalid("max slash count must be positive"));
        }
        if self.slash_magnitude < 1 {
            return Err(invalid("slash magnitude must be at least 1"));
        }
        if self.min_earned_stake_to_slash.denom != STAKE_DENOM {
            return Err(invalid(format!(
                "min earned stake to slash must be denominated in {}",
                STAKE_DENOM
            )));
        }
        if self.jail_duration_secs == 0 {
            return Err(invalid("jail duration must be positive"));
        }
        if self.slasher_reward_share > Dec::one() {
            return Err(invalid(format!(
                "slasher reward share {} exceeds 1",
                self.slasher_reward_share
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> AgoraError {
    AgoraError::InvalidParams(msg.into())
}

/// Sparse update for `Params`; the admin set is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_slash_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_slash_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slash_magnitude: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_earned_stake_to_slash: Option<Coin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_detailed_reason_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jail_duration_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slasher_reward_share: Option<Dec>,
}

impl ParamsUpdate {
    pub fn apply(&self, current: &Params) -> Params {
        let mut p = current.clone();
        if let Some(v) = self.min_slash_count {
            p.min_slash_count = v;
        }
        if let Some(v) = self.max_slash_count {
            p.max_slash_count = v;
        }
        if let Some(v) = self.slash_magnitude {
            p.slash_magnitude = v;
        }
        if let Some(v) = &self.min_earned_stake_to_slash {
            p.min_earned_stake_to_slash = v.clone();
        }
        if let Some(v) = self.max_detailed_reason_length {
            p.max_detailed_reason_length = v;
        }
        if let Some(v) = self.jail_duration_secs {
            p.jail_duration_secs = v;
        }
        if let Some(v) = self.slasher_reward_share {
            p.slasher_reward_share = v;
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = Params::default();
        params.validate().unwrap();
        assert_eq!(params.slasher_reward_share.to_string(), "0.250000000000000000");
    }

    #[test]
    fn test_reject_zero_counts_and_magnitude() {
        for params in [
            Params { min_slash_count: 0, ..Params::default() },
            Params { max_slash_count: 0, ..Params::default() },
            Params { slash_magnitude: 0, ..Params::default() },
            Params { jail_duration_secs: 0, ..Params::default() },
        ] {
            assert!(matches!(params.validate(), Err(AgoraError::InvalidParams(_))));
        }
    }

    #[test]
    fn test_update_keeps_admins() {
        let admin = agora_core::Address::random();
        let current = Params {
            slash_admins: AdminSet::new(vec![admin]),
            ..Params::default()
        };
        let update = ParamsUpdate {
            min_slash_count: Some(2),
            ..ParamsUpdate::default()
        };
        let updated = update.apply(&current);
        assert_eq!(updated.min_slash_count, 2);
        assert!(updated.slash_admins.contains(&admin));
    }
}
