// crates/agora-staking/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::{Address, Coin, Coins, TransactionKind};

/// Which side of a claim an argument takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Backing,
    Challenge,
}

impl Stance {
    /// Kind tag for the creation stake transfer.
    pub fn transaction_kind(&self) -> TransactionKind {
        match self {
            Stance::Backing => TransactionKind::Backing,
            Stance::Challenge => TransactionKind::Challenge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeType {
    Backing,
    Challenge,
    Upvote,
}

impl StakeType {
    /// Kind tag for returning the principal.
    pub fn returned_kind(&self) -> TransactionKind {
        match self {
            StakeType::Backing => TransactionKind::BackingReturned,
            StakeType::Challenge => TransactionKind::ChallengeReturned,
            StakeType::Upvote => TransactionKind::UpvoteReturned,
        }
    }
}

impl From<Stance> for StakeType {
    fn from(stance: Stance) -> Self {
        match stance {
            Stance::Backing => StakeType::Backing,
            Stance::Challenge => StakeType::Challenge,
        }
    }
}

/// A position taken on a claim, backed by the creator's stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: u64,
    pub claim_id: u64,
    pub creator: Address,
    pub body: String,
    pub summary: String,
    pub stake_type: Stance,
    /// Sum of live stakes on this argument.
    pub total_stake: Coin,
    pub upvote_count: u64,
    pub is_unhelpful: bool,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub edited_time: Option<DateTime<Utc>>,
}

/// Escrowed tokens attached to an argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub id: u64,
    pub argument_id: u64,
    /// Community of the claim the argument belongs to. Earned coins from this
    /// stake are credited in this denomination.
    pub community_id: String,
    pub staker: Address,
    pub amount: Coin,
    pub stake_type: StakeType,
    pub created_time: DateTime<Utc>,
    pub returned: bool,
    /// Principal was burned by a slash punishment.
    #[serde(default)]
    pub forfeited: bool,
}

impl Stake {
    /// Still escrowed: neither withdrawn nor forfeited.
    pub fn is_live(&self) -> bool {
        !self.returned && !self.forfeited
    }
}

/// Cumulative interest credited to a user, keyed by community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEarnedCoins {
    pub address: Address,
    pub coins: Coins,
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub stake_id: u64,
    pub principal: Coin,
    /// Total interest accrued by the stake.
    pub interest: Coin,
    /// Part of `interest` paid to the staker.
    pub staker_interest: Coin,
    /// Part of `interest` paid to the argument creator.
    pub creator_interest: Coin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_maps_to_stake_type() {
        assert_eq!(StakeType::from(Stance::Backing), StakeType::Backing);
        assert_eq!(StakeType::from(Stance::Challenge), StakeType::Challenge);
    }

    #[test]
    fn test_stake_liveness() {
        let mut stake = Stake {
            id: 1,
            argument_id: 1,
            community_id: "crypto".to_string(),
            staker: Address::random(),
            amount: Coin::tokens(10),
            stake_type: StakeType::Upvote,
            created_time: Utc::now(),
            returned: false,
            forfeited: false,
        };
        assert!(stake.is_live());
        stake.forfeited = true;
        assert!(!stake.is_live());
    }

    #[test]
    fn test_stance_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Stance::Challenge).unwrap(), "\"challenge\"");
    }
}
