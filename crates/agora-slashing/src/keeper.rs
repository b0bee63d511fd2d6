// crates/agora-slashing/src/keeper.rs
//
// Slash records, eligibility, and the unhelpful threshold.
//
// CreateSlash checks, in order:
//   1. the argument exists                       -> InvalidArgument
//   2. an `Other` reason carries a detailed reason within the length limit
//                                                -> InvalidSlashReason
//   3. the creator is an admin or has earned enough interest
//                                                -> NotEnoughEarnedStake
//   4. the creator has not slashed this argument with this type before
//                                                -> AlreadyUnhelpful
//
// A slash from an admin punishes immediately; otherwise punishment fires when
// the number of slashes of that type on the argument reaches `min_slash_count`.
// Punishment happens at most once per argument: later slashes are recorded but
// never punish again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::{AdminSet, Address, Context, ParamSubspace};
use agora_staking::StakingKeeper;

use crate::params::{Params, ParamsUpdate, MODULE_NAME};
use crate::punishment::{punish, Punishment};
use crate::types::{Slash, SlashReason, SlashType};

/// Result of a CreateSlash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashOutcome {
    pub slash: Slash,
    /// Present when this slash triggered punishment.
    pub punishment: Option<Punishment>,
}

impl SlashOutcome {
    pub fn punished(&self) -> bool {
        self.punishment.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SlashingKeeper {
    pub(crate) params: ParamSubspace<Params>,
    pub(crate) slashes: BTreeMap<u64, Slash>,
    pub(crate) next_slash_id: u64,
}

impl SlashingKeeper {
    pub fn new(params: Params) -> Self {
        Self {
            params: ParamSubspace::new(MODULE_NAME, params),
            slashes: BTreeMap::new(),
            next_slash_id: 1,
        }
    }

    pub fn params(&self) -> &Params {
        self.params.get()
    }

    pub fn param_subspace(&self) -> &ParamSubspace<Params> {
        &self.params
    }

    pub fn admins(&self) -> &AdminSet {
        &self.params.get().slash_admins
    }

    pub fn is_admin(&self, address: &Address) -> bool {
        self.params.is_admin(address)
    }

    /// File a slash against an argument, punishing its creator if this slash
    /// crosses the threshold.
    #[allow(clippy::too_many_arguments)]
    pub fn create_slash(
        &mut self,
        ctx: &mut Context<'_>,
        staking: &mut StakingKeeper,
        argument_id: u64,
        slash_type: SlashType,
        reason: SlashReason,
        detailed_reason: &str,
        creator: Address,
    ) -> Result<SlashOutcome, AgoraError> {
        let params = self.params.get().clone();
        let argument = staking
            .argument(argument_id)
            .map_err(|_| AgoraError::InvalidArgument(argument_id))?;

        if reason == SlashReason::Other {
            let len = detailed_reason.chars().count();
            if len == 0 {
                return Err(AgoraError::InvalidSlashReason(
                    "a detailed reason is required when the reason is other".to_string(),
                ));
            }
            if len > params.max_detailed_reason_length {
                return Err(AgoraError::InvalidSlashReason(format!(
                    "detailed reason is {} characters, max is {}",
                    len, params.max_detailed_reason_length
                )));
            }
        }

        let is_admin = self.params.is_admin(&creator);
        if !is_admin {
            let earned = staking.total_earned_coins(&creator)?;
            if earned.amount < params.min_earned_stake_to_slash.amount {
                tracing::debug!(%creator, %earned, "not enough earned stake to slash");
                return Err(AgoraError::NotEnoughEarnedStake(creator));
            }
        }

        if self
            .slashes
            .values()
            .any(|s| s.argument_id == argument_id && s.creator == creator && s.slash_type == slash_type)
        {
            return Err(AgoraError::AlreadyUnhelpful);
        }

        let slash = Slash {
            id: self.next_slash_id,
            argument_id,
            creator,
            slash_type,
            reason,
            detailed_reason: detailed_reason.to_string(),
            created_time: ctx.block_time(),
        };
        let count = self.slash_count(argument_id, slash_type) as u64 + 1;
        let threshold_met = is_admin || count >= params.min_slash_count;

        let punishment = if threshold_met && !argument.is_unhelpful {
            let punishment = punish(ctx, staking, &params, &argument, creator, slash.id)?;
            staking.mark_unhelpful(argument_id)?;
            Some(punishment)
        } else {
            None
        };

        self.slashes.insert(slash.id, slash.clone());
        self.next_slash_id += 1;
        tracing::info!(
            slash_id = slash.id,
            argument_id,
            %creator,
            reason = %reason,
            count,
            punished = punishment.is_some(),
            "slash created"
        );
        Ok(SlashOutcome { slash, punishment })
    }

    pub fn slash(&self, id: u64) -> Result<Slash, AgoraError> {
        self.slashes.get(&id).cloned().ok_or(AgoraError::SlashNotFound(id))
    }

    /// All slashes in creation order.
    pub fn slashes(&self) -> Vec<Slash> {
        self.slashes.values().cloned().collect()
    }

    pub fn argument_slashes(&self, argument_id: u64) -> Vec<Slash> {
        self.slashes
            .values()
            .filter(|s| s.argument_id == argument_id)
            .cloned()
            .collect()
    }

    /// Number of slashes of one type recorded against an argument.
    pub fn slash_count(&self, argument_id: u64, slash_type: SlashType) -> usize {
        self.slashes
            .values()
            .filter(|s| s.argument_id == argument_id && s.slash_type == slash_type)
            .count()
    }

    pub fn add_admin(&mut self, address: Address, requester: &Address) -> Result<(), AgoraError> {
        self.params.add_admin(address, requester)
    }

    pub fn remove_admin(&mut self, address: &Address, requester: &Address) -> Result<(), AgoraError> {
        self.params.remove_admin(address, requester)
    }

    pub fn update_params(
        &mut self,
        requester: &Address,
        update: &ParamsUpdate,
    ) -> Result<Params, AgoraError> {
        self.params.ensure_admin(requester)?;
        let updated = update.apply(self.params.get());
        updated.validate()?;
        self.params.set(updated.clone());
        Ok(updated)
    }
}

impl Default for SlashingKeeper {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestEnv;
    use agora_core::traits::{AccountKeeper, BankKeeper, ClaimKeeper};
    use agora_core::{Coin, REWARD_POOL, STAKE_DENOM};
    use agora_staking::Stance;

    fn slash(
        env: &mut TestEnv,
        argument_id: u64,
        reason: SlashReason,
        detail: &str,
        creator: Address,
    ) -> Result<SlashOutcome, AgoraError> {
        let (staking, slashing, mut ctx) = env.parts();
        slashing.create_slash(&mut ctx, staking, argument_id, SlashType::Unhelpful, reason, detail, creator)
    }

    #[test]
    fn test_admin_slash_punishes_immediately() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let slasher = env.admins[1];
        let slasher_start = env.balance(&slasher);
        let argument = env.submit_argument(staker, Stance::Challenge);
        assert_eq!(env.balance(&staker), Coin::tokens(250));
        assert_eq!(env.claims.claim(env.claim_id).unwrap().total_challenged, Coin::tokens(50));

        let outcome = slash(&mut env, argument.id, SlashReason::Plagiarism, "", slasher).unwrap();
        assert!(outcome.punished());
        let punishment = outcome.punishment.unwrap();
        assert_eq!(punishment.penalty, Coin::tokens(150));
        assert_eq!(punishment.reward, Coin::stake(12_500_000));

        // Lost 50 * 3 in total.
        assert_eq!(env.balance(&staker), Coin::tokens(150));
        assert_eq!(
            env.balance(&slasher),
            slasher_start.checked_add(&Coin::stake(12_500_000)).unwrap()
        );
        assert!(env.claims.claim(env.claim_id).unwrap().total_challenged.is_zero());
        assert!(env.staking.argument(argument.id).unwrap().is_unhelpful);
        assert!(env.staking.argument(argument.id).unwrap().total_stake.is_zero());
    }

    #[test]
    fn test_threshold_punishment_by_earners() {
        let mut env = TestEnv::new();
        let first = env.earner(10);
        let second = env.earner(10);
        env.slashing
            .update_params(&env.admins[0], &ParamsUpdate { min_slash_count: Some(2), ..ParamsUpdate::default() })
            .unwrap();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Challenge);

        let outcome = slash(&mut env, argument.id, SlashReason::PoorlyWritten, "", first).unwrap();
        assert!(!outcome.punished());
        assert!(!env.staking.argument(argument.id).unwrap().is_unhelpful);

        let outcome = slash(&mut env, argument.id, SlashReason::PoorlyWritten, "", second).unwrap();
        assert!(outcome.punished());
        assert_eq!(env.balance(&second), Coin::stake(12_500_000));
        assert_eq!(env.balance(&staker), Coin::tokens(150));
        assert!(env.claims.claim(env.claim_id).unwrap().total_challenged.is_zero());
        assert_eq!(env.slashing.slashes().len(), 2);
    }

    #[test]
    fn test_punishment_is_one_shot() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let [first, second] = env.admins;
        slash(&mut env, argument.id, SlashReason::Plagiarism, "", first).unwrap();
        let staker_after = env.balance(&staker);
        let pool_after = env.bank.module_balance(REWARD_POOL, STAKE_DENOM).unwrap();

        let outcome = slash(&mut env, argument.id, SlashReason::Plagiarism, "", second).unwrap();
        assert!(!outcome.punished());
        assert_eq!(env.balance(&staker), staker_after);
        assert_eq!(env.bank.module_balance(REWARD_POOL, STAKE_DENOM).unwrap(), pool_after);
        assert_eq!(env.slashing.argument_slashes(argument.id).len(), 2);
    }

    #[test]
    fn test_withdrawn_creator_is_counted_but_loses_nothing() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let admin = env.admins[0];
        let argument = env.submit_argument(staker, Stance::Backing);
        let stake_id = env.staking.user_stakes(&staker)[0].id;
        {
            let (staking, _, mut ctx) = env.parts();
            staking.withdraw_stake(&mut ctx, stake_id, staker).unwrap();
        }
        assert_eq!(env.balance(&staker), Coin::tokens(300));
        let admin_start = env.balance(&admin);
        let pool_start = env.bank.module_balance(REWARD_POOL, STAKE_DENOM).unwrap();

        let outcome = slash(&mut env, argument.id, SlashReason::Plagiarism, "", admin).unwrap();
        let punishment = outcome.punishment.unwrap();
        assert!(punishment.forfeited_stakes.is_empty());
        assert!(punishment.penalty.is_zero());
        assert!(punishment.reward.is_zero());
        assert_eq!(punishment.slash_count, 1);
        assert!(!punishment.jailed);

        assert_eq!(env.balance(&staker), Coin::tokens(300));
        assert_eq!(env.balance(&admin), admin_start);
        assert_eq!(env.bank.module_balance(REWARD_POOL, STAKE_DENOM).unwrap(), pool_start);
        assert!(env.staking.argument(argument.id).unwrap().is_unhelpful);
        assert_eq!(env.accounts.status(&staker).slash_count, 1);
    }

    #[test]
    fn test_invalid_argument() {
        let mut env = TestEnv::new();
        let admin = env.admins[0];
        let err = slash(&mut env, 404, SlashReason::Plagiarism, "", admin).unwrap_err();
        assert_eq!(err, AgoraError::InvalidArgument(404));
    }

    #[test]
    fn test_detailed_reason_too_long() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let admin = env.admins[0];
        let detail = "This is a very very very descriptive reason to slash an argument. \
                      I am writing it in this detail to make the validation fail. I hope it works!";
        let err = slash(&mut env, argument.id, SlashReason::Other, detail, admin).unwrap_err();
        assert!(matches!(err, AgoraError::InvalidSlashReason(_)));

        let err = slash(&mut env, argument.id, SlashReason::Other, "", admin).unwrap_err();
        assert!(matches!(err, AgoraError::InvalidSlashReason(_)));

        // A long detail is fine when the reason is not Other.
        slash(&mut env, argument.id, SlashReason::Plagiarism, detail, admin).unwrap();
    }

    #[test]
    fn test_not_enough_earned_stake() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let poor = env.earner(9);
        let err = slash(&mut env, argument.id, SlashReason::Plagiarism, "", poor).unwrap_err();
        assert_eq!(err, AgoraError::NotEnoughEarnedStake(poor));
        assert!(env.slashing.slashes().is_empty());
    }

    #[test]
    fn test_duplicate_slash_rejected() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let earner = env.earner(10);
        slash(&mut env, argument.id, SlashReason::Plagiarism, "", earner).unwrap();
        let err = slash(&mut env, argument.id, SlashReason::FocusedOnPerson, "", earner).unwrap_err();
        assert_eq!(err, AgoraError::AlreadyUnhelpful);
        assert_eq!(env.slashing.slash_count(argument.id, SlashType::Unhelpful), 1);
    }

    #[test]
    fn test_slash_lookup() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let admin = env.admins[0];
        let created = slash(&mut env, argument.id, SlashReason::Plagiarism, "", admin).unwrap();
        assert_eq!(env.slashing.slash(created.slash.id).unwrap(), created.slash);
        assert_eq!(env.slashing.slash(404).unwrap_err(), AgoraError::SlashNotFound(404));
    }

    #[test]
    fn test_forfeited_stake_cannot_be_withdrawn() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let admin = env.admins[0];
        slash(&mut env, argument.id, SlashReason::Plagiarism, "", admin).unwrap();

        let (staking, _, mut ctx) = env.parts();
        let err = staking.withdraw_stake(&mut ctx, 1, staker).unwrap_err();
        assert_eq!(err, AgoraError::StakeForfeited(1));
    }

    #[test]
    fn test_upvoter_keeps_stake_after_punishment() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let voter = env.funded_user(100);
        let argument = env.submit_argument(staker, Stance::Backing);
        let upvote = {
            let (staking, _, mut ctx) = env.parts();
            staking.submit_upvote(&mut ctx, argument.id, voter).unwrap()
        };
        let admin = env.admins[0];
        slash(&mut env, argument.id, SlashReason::Plagiarism, "", admin).unwrap();
        assert_eq!(env.claims.claim(env.claim_id).unwrap().total_backed, Coin::tokens(10));

        let (staking, _, mut ctx) = env.parts();
        staking.withdraw_stake(&mut ctx, upvote.id, voter).unwrap();
        assert_eq!(env.balance(&voter), Coin::tokens(100));
        assert!(env.claims.claim(env.claim_id).unwrap().total_backed.is_zero());
    }

    #[test]
    fn test_repeat_offender_is_jailed() {
        let mut env = TestEnv::new();
        env.slashing
            .update_params(&env.admins[0], &ParamsUpdate { max_slash_count: Some(2), ..ParamsUpdate::default() })
            .unwrap();
        let staker = env.funded_user(1_000);
        let admin = env.admins[0];

        let first = env.submit_argument(staker, Stance::Backing);
        let outcome = slash(&mut env, first.id, SlashReason::Plagiarism, "", admin).unwrap();
        assert!(!outcome.punishment.unwrap().jailed);
        assert!(!env.accounts.is_jailed(&staker).unwrap());

        let second = env.submit_argument(staker, Stance::Challenge);
        let outcome = slash(&mut env, second.id, SlashReason::Plagiarism, "", admin).unwrap();
        let punishment = outcome.punishment.unwrap();
        assert!(punishment.jailed);
        assert_eq!(punishment.slash_count, 2);
        assert!(env.accounts.is_jailed(&staker).unwrap());
        assert_eq!(
            env.accounts.status(&staker).jail_end_time,
            Some(env.now + chrono::Duration::days(7))
        );
    }

    #[test]
    fn test_empty_reward_pool_fails_without_effect() {
        let mut env = TestEnv::new();
        let staker = env.funded_user(300);
        let argument = env.submit_argument(staker, Stance::Backing);
        let reserve = env.bank.module_balance(REWARD_POOL, STAKE_DENOM).unwrap();
        env.bank.burn_coins(REWARD_POOL, &reserve).unwrap();
        let admin = env.admins[0];

        let err = slash(&mut env, argument.id, SlashReason::Plagiarism, "", admin).unwrap_err();
        assert!(matches!(err, AgoraError::InsufficientPoolFunds { .. }));
        assert!(!env.staking.argument(argument.id).unwrap().is_unhelpful);
        assert!(env.slashing.slashes().is_empty());
        assert_eq!(env.balance(&staker), Coin::tokens(250));
    }

    #[test]
    fn test_admin_governance() {
        let mut env = TestEnv::new();
        let [a, b] = env.admins;
        let outsider = Address::random();
        assert_eq!(
            env.slashing.add_admin(outsider, &outsider).unwrap_err(),
            AgoraError::AddressNotAuthorised(outsider)
        );
        env.slashing.remove_admin(&a, &a).unwrap();
        assert_eq!(env.slashing.admins().len(), 1);
        assert!(env.slashing.add_admin(a, &a).is_err());
        env.slashing.add_admin(a, &b).unwrap();
        assert!(env.slashing.is_admin(&a));
    }
}
