// crates/agora-staking/src/querier.rs
//
// Read-only views over staking state. Lists come back in id order.

use chrono::{DateTime, Utc};

use agora_core::error::AgoraError;
use agora_core::{Address, Coin, Coins, STAKE_DENOM};

use crate::keeper::StakingKeeper;
use crate::types::{Argument, Stake, UserEarnedCoins};

impl StakingKeeper {
    pub fn argument(&self, id: u64) -> Result<Argument, AgoraError> {
        self.arguments
            .get(&id)
            .cloned()
            .ok_or(AgoraError::ArgumentNotFound(id))
    }

    /// Look up several arguments at once. Fails on the first unknown id.
    pub fn arguments_by_ids(&self, ids: &[u64]) -> Result<Vec<Argument>, AgoraError> {
        ids.iter().map(|id| self.argument(*id)).collect()
    }

    pub fn arguments(&self) -> Vec<Argument> {
        self.arguments.values().cloned().collect()
    }

    /// Arguments on a claim, in submission order.
    pub fn claim_arguments(&self, claim_id: u64) -> Vec<Argument> {
        self.claim_arguments
            .get(&claim_id)
            .map(|ids| ids.iter().filter_map(|id| self.arguments.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    /// The helpful argument with the most stake on a claim. Ties go to the
    /// earliest argument.
    pub fn top_argument(&self, claim_id: u64) -> Option<Argument> {
        let mut top: Option<Argument> = None;
        for argument in self.claim_arguments(claim_id) {
            if argument.is_unhelpful {
                continue;
            }
            match &top {
                Some(best) if best.total_stake.amount >= argument.total_stake.amount => {}
                _ => top = Some(argument),
            }
        }
        top
    }

    pub fn stake(&self, id: u64) -> Result<Stake, AgoraError> {
        self.stakes.get(&id).cloned().ok_or(AgoraError::StakeNotFound(id))
    }

    pub fn stakes(&self) -> Vec<Stake> {
        self.stakes.values().cloned().collect()
    }

    pub fn argument_stakes(&self, argument_id: u64) -> Vec<Stake> {
        self.filter_stakes(|s| s.argument_id == argument_id)
    }

    /// Every stake placed in a community, including returned and forfeited ones.
    pub fn community_stakes(&self, community_id: &str) -> Vec<Stake> {
        self.filter_stakes(|s| s.community_id == community_id)
    }

    pub fn user_stakes(&self, address: &Address) -> Vec<Stake> {
        self.filter_stakes(|s| s.staker == *address)
    }

    pub fn user_community_stakes(&self, address: &Address, community_id: &str) -> Vec<Stake> {
        self.filter_stakes(|s| s.staker == *address && s.community_id == community_id)
    }

    /// A user's stakes created strictly after `after`.
    pub fn user_stakes_after(&self, address: &Address, after: DateTime<Utc>) -> Vec<Stake> {
        self.filter_stakes(|s| s.staker == *address && s.created_time > after)
    }

    /// Live stake a user holds in a community.
    pub fn user_community_stake_total(&self, address: &Address, community_id: &str) -> Result<Coin, AgoraError> {
        sum_live(self.user_community_stakes(address, community_id).iter())
    }

    /// Live stake a user holds on an argument.
    pub fn user_argument_stake_total(&self, address: &Address, argument_id: u64) -> Result<Coin, AgoraError> {
        sum_live(
            self.stakes
                .values()
                .filter(|s| s.staker == *address && s.argument_id == argument_id),
        )
    }

    /// Live stakes a user holds on one argument. Used by punishment.
    pub fn live_stakes_of(&self, address: &Address, argument_id: u64) -> Vec<Stake> {
        self.filter_stakes(|s| s.staker == *address && s.argument_id == argument_id && s.is_live())
    }

    /// Earned coins per community.
    pub fn earned_coins(&self, address: &Address) -> Coins {
        self.earned.get(address).cloned().unwrap_or_default()
    }

    /// Earned coins across every community, summed 1:1 into the native
    /// denomination.
    pub fn total_earned_coins(&self, address: &Address) -> Result<Coin, AgoraError> {
        Ok(Coin::stake(self.earned_coins(address).total_amount()?))
    }

    pub fn users_earnings(&self) -> Vec<UserEarnedCoins> {
        self.earned
            .iter()
            .map(|(address, coins)| UserEarnedCoins {
                address: *address,
                coins: coins.clone(),
            })
            .collect()
    }

    fn filter_stakes(&self, pred: impl Fn(&Stake) -> bool) -> Vec<Stake> {
        self.stakes.values().filter(|s| pred(s)).cloned().collect()
    }
}

fn sum_live<'a>(stakes: impl Iterator<Item = &'a Stake>) -> Result<Coin, AgoraError> {
    stakes
        .filter(|s| s.is_live())
        .try_fold(Coin::zero(STAKE_DENOM), |acc, s| acc.checked_add(&s.amount))
}
