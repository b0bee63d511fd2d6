// crates/agora-staking/src/params.rs
//
// Staking parameters.
//
// Defaults:
//   - Interest period: 7 days
//   - Argument creation stake: 50 AGR
//   - Upvote stake: 10 AGR
//   - Body length: 25..=1250 characters
//   - Summary length: 25..=140 characters
//   - Creator share of upvote interest: 0.50
//   - Interest rate per period: 1.05 (5% compounding)
//   - Upvotes needed to unjail an argument creator: 1
//   - Arguments per claim: 5

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::{AdminGoverned, AdminSet, Coin, Dec, STAKE_DENOM};

/// Parameter namespace of the staking engine.
pub const MODULE_NAME: &str = "staking";

/// Length of one interest period: 7 days.
pub const DEFAULT_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub period_secs: u64,
    pub argument_creation_stake: Coin,
    pub argument_body_max_length: usize,
    pub argument_body_min_length: usize,
    pub argument_summary_max_length: usize,
    pub argument_summary_min_length: usize,
    pub upvote_stake: Coin,
    /// Fraction of an upvote's interest paid to the argument creator.
    pub creator_share: Dec,
    /// Per-period multiplier applied to a stake's value.
    pub interest_rate: Dec,
    pub staking_admins: AdminSet,
    /// Upvotes an argument needs before its jailed creator is released.
    pub unjail_upvotes: u64,
    pub max_arguments_per_claim: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_PERIOD_SECS,
            argument_creation_stake: Coin::tokens(50),
            argument_body_max_length: 1250,
            argument_body_min_length: 25,
            argument_summary_max_length: 140,
            argument_summary_min_length: 25,
            upvote_stake: Coin::tokens(10),
            creator_share: Dec::from_raw(500_000_000_000_000_000),
            interest_rate: Dec::from_raw(1_050_000_000_000_000_000),
            staking_admins: AdminSet::default(),
            unjail_upvotes: 1,
            max_arguments_per_claim: 5,
        }
    }
}

impl AdminGoverned for Params {
    fn admins(&self) -> &AdminSet {
        &self.staking_admins
    }

    fn admins_mut(&mut self) -> &mut AdminSet {
        &mut self.staking_admins
    }
}

impl Params {
    /// Reject parameter sets the engine cannot run with.
    pub fn validate(&self) -> Result<(), AgoraError> {
        if self.period_secs == 0 {
            return Err(invalid("period must be positive"));
        }
        for (name, coin) in [
            ("argument creation stake", &self.argument_creation_stake),
            ("upvote stake", &self.upvote_stake),
        ] {
            if coin.denom != STAKE_DENOM {
                return Err(invalid(format!("{} must be denominated in {}", name, STAKE_DENOM)));
            }
            if coin.is_zero() {
                return Err(invalid(format!("{} must be positive", name)));
            }
        }
        if self.argument_body_min_length > self.argument_body_max_length {
            return Err(invalid("argument body min length exceeds max length"));
        }
        if self.argument_summary_min_length > self.argument_summary_max_length {
            return Err(invalid("argument summary min length exceeds max length"));
        }
        if self.creator_share > Dec::one() {
            return Err(invalid(format!("creator share {} exceeds 1", self.creator_share)));
        }
        if self.interest_rate < Dec::one() {
            return Err(invalid(format!("interest rate {} is below 1", self.interest_rate)));
        }
        if self.max_arguments_per_claim == 0 {
            return Err(invalid("max arguments per claim must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> AgoraError {
    AgoraError::InvalidParams(msg.into())
}

/// Sparse update for `Params`. Absent fields keep their current value. The
/// admin set is only changed through add/remove admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_creation_stake: Option<Coin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_body_max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_body_min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_summary_max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_summary_min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_stake: Option<Coin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_share: Option<Dec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Dec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unjail_upvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_arguments_per_claim: Option<usize>,
}

impl ParamsUpdate {
    /// Overlay the present fields onto `current`.
    pub fn apply(&self, current: &Params) -> Params {
        let mut p = current.clone();
        if let Some(v) = self.period_secs {
            p.period_secs = v;
        }
        if let Some(v) = &self.argument_creation_stake {
            p.argument_creation_stake = v.clone();
        }
        if let Some(v) = self.argument_body_max_length {
            p.argument_body_max_length = v;
        }
        if let Some(v) = self.argument_body_min_length {
            p.argument_body_min_length = v;
        }
        if let Some(v) = self.argument_summary_max_length {
            p.argument_summary_max_length = v;
        }
        if let Some(v) = self.argument_summary_min_length {
            p.argument_summary_min_length = v;
        }
        if let Some(v) = &self.upvote_stake {
            p.upvote_stake = v.clone();
        }
        if let Some(v) = self.creator_share {
            p.creator_share = v;
        }
        if let Some(v) = self.interest_rate {
            p.interest_rate = v;
        }
        if let Some(v) = self.unjail_upvotes {
            p.unjail_upvotes = v;
        }
        if let Some(v) = self.max_arguments_per_claim {
            p.max_arguments_per_claim = v;
        }
        p
    }
}
