// crates/agora-slashing/src/punishment.rs
//
// Punishment of an argument creator once their argument is judged unhelpful.
//
// For each live stake the creator holds on the argument:
//   1. The stake is forfeited: argument and claim totals drop by its amount
//      and the escrowed principal is burned from the stakes pool.
//   2. A further `amount * (magnitude - 1)` is taken from the creator's
//      balance and burned, capped at what they hold. Total loss is therefore
//      `amount * magnitude` when the creator can cover it.
//   3. The slasher is paid `trunc(amount * slasher_reward_share)` from the
//      reward pool.
//
// The creator's slash count is then incremented; reaching `max_slash_count`
// jails them for `jail_duration_secs`.
//
// A creator who already withdrew their stake has nothing left to forfeit. The
// punishment then moves no tokens and pays no reward, but the slash count
// still grows and the argument is still marked unhelpful.
//
// All amounts are computed and the reward pool checked before any state
// changes.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::traits::{AccountKeeper, BankKeeper};
use agora_core::{Address, Coin, Context, TransactionKind, REWARD_POOL, STAKES_POOL, STAKE_DENOM};
use agora_staking::{Argument, Stake, StakingKeeper};

use crate::params::Params;

/// Tokens moved by punishing one stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyPlan {
    /// Escrowed principal burned from the stakes pool.
    pub forfeited: u64,
    /// Extra amount taken from the creator's balance and burned.
    pub extra: u64,
    /// Paid to the slasher.
    pub reward: u64,
}

/// Work out the penalty for a stake of `amount` when the creator holds
/// `balance`. The extra penalty never exceeds `balance`.
pub fn compute_penalty(amount: u64, params: &Params, balance: u64) -> Result<PenaltyPlan, AgoraError> {
    let extra = amount
        .checked_mul(params.slash_magnitude.saturating_sub(1))
        .ok_or_else(|| AgoraError::InvariantViolation(format!("penalty overflow on stake of {}", amount)))?;
    Ok(PenaltyPlan {
        forfeited: amount,
        extra: extra.min(balance),
        reward: params.slasher_reward_share.mul_truncate(amount)?,
    })
}

/// What a punishment did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punishment {
    pub argument_id: u64,
    pub creator: Address,
    pub slasher: Address,
    pub forfeited_stakes: Vec<u64>,
    /// Total tokens the creator lost: forfeited principal plus extra penalty.
    pub penalty: Coin,
    pub reward: Coin,
    pub slash_count: u32,
    pub jailed: bool,
}

pub(crate) fn punish(
    ctx: &mut Context<'_>,
    staking: &mut StakingKeeper,
    params: &Params,
    argument: &Argument,
    slasher: Address,
    slash_id: u64,
) -> Result<Punishment, AgoraError> {
    let creator = argument.creator;
    let stakes = staking.live_stakes_of(&creator, argument.id);

    let mut balance = ctx.bank.balance(&creator, STAKE_DENOM).amount;
    let mut plans: Vec<(Stake, PenaltyPlan)> = Vec::with_capacity(stakes.len());
    let mut total_reward = 0u64;
    for stake in stakes {
        let plan = compute_penalty(stake.amount.amount, params, balance)?;
        balance -= plan.extra;
        total_reward = checked_sum(total_reward, plan.reward)?;
        plans.push((stake, plan));
    }
    let reward = Coin::stake(total_reward);
    let available = ctx.bank.module_balance(REWARD_POOL, STAKE_DENOM)?;
    if !available.is_gte(&reward) {
        return Err(AgoraError::InsufficientPoolFunds {
            pool: REWARD_POOL.to_string(),
            needed: reward,
            available,
        });
    }

    let mut penalty = 0u64;
    let mut forfeited_stakes = Vec::with_capacity(plans.len());
    for (stake, plan) in &plans {
        staking.forfeit_stake(ctx, stake.id)?;
        ctx.bank.burn_coins(STAKES_POOL, &stake.amount)?;
        if plan.extra > 0 {
            let extra = Coin::stake(plan.extra);
            ctx.bank.send_from_account_to_module(
                &creator,
                STAKES_POOL,
                &extra,
                TransactionKind::SlashPenalty,
                slash_id,
            )?;
            ctx.bank.burn_coins(STAKES_POOL, &extra)?;
        }
        if plan.reward > 0 {
            ctx.bank.send_from_module_to_account(
                REWARD_POOL,
                &slasher,
                &Coin::stake(plan.reward),
                TransactionKind::SlashReward,
                slash_id,
            )?;
        }
        penalty = checked_sum(penalty, checked_sum(plan.forfeited, plan.extra)?)?;
        forfeited_stakes.push(stake.id);
    }

    let slash_count = ctx.accounts.increment_slash_count(&creator)?;
    let jailed = slash_count >= params.max_slash_count;
    if jailed {
        let secs = i64::try_from(params.jail_duration_secs)
            .map_err(|_| AgoraError::InvalidParams("jail duration out of range".to_string()))?;
        let until = ctx.block_time() + Duration::seconds(secs);
        ctx.accounts.jail(&creator, until)?;
    }

    tracing::info!(
        argument_id = argument.id,
        %creator,
        %slasher,
        penalty,
        reward = total_reward,
        slash_count,
        jailed,
        "argument creator punished"
    );
    Ok(Punishment {
        argument_id: argument.id,
        creator,
        slasher,
        forfeited_stakes,
        penalty: Coin::stake(penalty),
        reward,
        slash_count,
        jailed,
    })
}

fn checked_sum(a: u64, b: u64) -> Result<u64, AgoraError> {
    a.checked_add(b)
        .ok_or_else(|| AgoraError::InvariantViolation(format!("amount overflow: {} + {}", a, b)))
}
