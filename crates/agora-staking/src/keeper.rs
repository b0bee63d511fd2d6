// crates/agora-staking/src/keeper.rs
//
// Staking engine state and commands.
//
// Every command validates fully before moving any tokens, so a failed command
// leaves the keeper, the bank, and the claim registry untouched. Token
// movements go through the `BankKeeper` in the context and are tagged with the
// stake id they belong to.
//
// Invariants kept here:
//   - argument.total_stake == sum of live stakes on the argument
//   - claim.total_backed / total_challenged == sum of live stakes on the
//     claim's backing / challenging arguments
//   - a stake is paid out at most once

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use agora_core::error::AgoraError;
use agora_core::traits::{AccountKeeper, BankKeeper, ClaimKeeper};
use agora_core::{
    AdminSet, Address, Coin, Coins, Context, ParamSubspace, TransactionKind, STAKES_POOL,
};

use crate::interest::{accrued_interest, elapsed_periods, split_interest};
use crate::params::{Params, ParamsUpdate, MODULE_NAME};
use crate::types::{Argument, Stake, StakeType, Stance, Withdrawal};

#[derive(Debug, Clone)]
pub struct StakingKeeper {
    pub(crate) params: ParamSubspace<Params>,
    pub(crate) arguments: BTreeMap<u64, Argument>,
    pub(crate) stakes: BTreeMap<u64, Stake>,
    /// Argument ids per claim, in submission order.
    pub(crate) claim_arguments: BTreeMap<u64, Vec<u64>>,
    pub(crate) earned: BTreeMap<Address, Coins>,
    pub(crate) next_argument_id: u64,
    pub(crate) next_stake_id: u64,
}

impl StakingKeeper {
    pub fn new(params: Params) -> Self {
        Self {
            params: ParamSubspace::new(MODULE_NAME, params),
            arguments: BTreeMap::new(),
            stakes: BTreeMap::new(),
            claim_arguments: BTreeMap::new(),
            earned: BTreeMap::new(),
            next_argument_id: 1,
            next_stake_id: 1,
        }
    }

    pub fn params(&self) -> &Params {
        self.params.get()
    }

    pub fn param_subspace(&self) -> &ParamSubspace<Params> {
        &self.params
    }

    pub fn admins(&self) -> &AdminSet {
        &self.params.get().staking_admins
    }

    pub fn is_admin(&self, address: &Address) -> bool {
        self.params.is_admin(address)
    }

    /// Submit a new argument on a claim, escrowing the creation stake.
    pub fn submit_argument(
        &mut self,
        ctx: &mut Context<'_>,
        body: &str,
        summary: &str,
        creator: Address,
        claim_id: u64,
        stance: Stance,
    ) -> Result<Argument, AgoraError> {
        let params = self.params.get().clone();
        let claim = ctx
            .claims
            .claim(claim_id)
            .ok_or(AgoraError::ClaimNotFound(claim_id))?;

        let existing = self.claim_arguments.get(&claim_id).map_or(0, Vec::len);
        if existing >= params.max_arguments_per_claim {
            return Err(AgoraError::ClaimArgumentLimitExceeded {
                claim_id,
                max: params.max_arguments_per_claim,
            });
        }
        check_lengths(&params, body, summary)?;
        if ctx.accounts.is_jailed(&creator)? {
            return Err(AgoraError::AccountJailed(creator));
        }
        let amount = params.argument_creation_stake.clone();
        ensure_balance(ctx, &creator, &amount)?;

        let now = ctx.block_time();
        let argument_id = self.next_argument_id;
        let stake_id = self.next_stake_id;
        ctx.bank.send_from_account_to_module(
            &creator,
            STAKES_POOL,
            &amount,
            stance.transaction_kind(),
            stake_id,
        )?;
        add_to_claim(ctx, claim_id, stance, &amount)?;
        if claim.first_argument_time.is_none() {
            ctx.claims.set_first_argument_time(claim_id, now)?;
        }

        let argument = Argument {
            id: argument_id,
            claim_id,
            creator,
            body: body.to_string(),
            summary: summary.to_string(),
            stake_type: stance,
            total_stake: amount.clone(),
            upvote_count: 0,
            is_unhelpful: false,
            created_time: now,
            edited: false,
            edited_time: None,
        };
        self.arguments.insert(argument_id, argument.clone());
        self.claim_arguments.entry(claim_id).or_default().push(argument_id);
        self.next_argument_id += 1;
        self.insert_stake(argument_id, &claim.community_id, creator, amount, stance.into(), now);

        tracing::info!(
            argument_id,
            claim_id,
            %creator,
            stance = ?stance,
            "argument submitted"
        );
        Ok(argument)
    }

    /// Upvote an argument, escrowing the upvote stake.
    pub fn submit_upvote(
        &mut self,
        ctx: &mut Context<'_>,
        argument_id: u64,
        staker: Address,
    ) -> Result<Stake, AgoraError> {
        let params = self.params.get().clone();
        let argument = self
            .arguments
            .get(&argument_id)
            .cloned()
            .ok_or(AgoraError::ArgumentNotFound(argument_id))?;
        if argument.is_unhelpful {
            return Err(AgoraError::ArgumentUnhelpful(argument_id));
        }
        if ctx.accounts.is_jailed(&staker)? {
            return Err(AgoraError::AccountJailed(staker));
        }
        let amount = params.upvote_stake.clone();
        ensure_balance(ctx, &staker, &amount)?;
        let claim = ctx
            .claims
            .claim(argument.claim_id)
            .ok_or(AgoraError::ClaimNotFound(argument.claim_id))?;
        let new_total = argument.total_stake.checked_add(&amount)?;
        let upvote_count = argument.upvote_count + 1;
        let release_creator =
            upvote_count >= params.unjail_upvotes && ctx.accounts.is_jailed(&argument.creator)?;

        let now = ctx.block_time();
        let stake_id = self.next_stake_id;
        ctx.bank.send_from_account_to_module(
            &staker,
            STAKES_POOL,
            &amount,
            TransactionKind::Upvote,
            stake_id,
        )?;
        add_to_claim(ctx, argument.claim_id, argument.stake_type, &amount)?;

        if let Some(stored) = self.arguments.get_mut(&argument_id) {
            stored.total_stake = new_total;
            stored.upvote_count = upvote_count;
        }
        let stake = self.insert_stake(
            argument_id,
            &claim.community_id,
            staker,
            amount,
            StakeType::Upvote,
            now,
        );

        if release_creator {
            ctx.accounts.unjail(&argument.creator)?;
            tracing::info!(argument_id, creator = %argument.creator, upvote_count, "creator unjailed by upvotes");
        }

        tracing::info!(argument_id, stake_id, %staker, "argument upvoted");
        Ok(stake)
    }

    /// Replace an argument's body and summary. Only the creator may edit.
    pub fn edit_argument(
        &mut self,
        ctx: &mut Context<'_>,
        argument_id: u64,
        body: &str,
        summary: &str,
        editor: Address,
    ) -> Result<Argument, AgoraError> {
        let params = self.params.get();
        let argument = self
            .arguments
            .get(&argument_id)
            .ok_or(AgoraError::ArgumentNotFound(argument_id))?;
        if argument.creator != editor {
            return Err(AgoraError::NotArgumentCreator { argument_id, editor });
        }
        if argument.is_unhelpful {
            return Err(AgoraError::ArgumentUnhelpful(argument_id));
        }
        check_lengths(params, body, summary)?;

        let now = ctx.block_time();
        let argument = self
            .arguments
            .get_mut(&argument_id)
            .ok_or(AgoraError::ArgumentNotFound(argument_id))?;
        argument.body = body.to_string();
        argument.summary = summary.to_string();
        argument.edited = true;
        argument.edited_time = Some(now);
        tracing::info!(argument_id, %editor, "argument edited");
        Ok(argument.clone())
    }

    /// Return a stake's principal plus accrued interest to its owner.
    ///
    /// Interest is computed from whole periods elapsed since the stake was
    /// created. On an upvote, the argument creator receives their share of the
    /// interest at the same time. Claim and argument totals drop by the
    /// principal only.
    pub fn withdraw_stake(
        &mut self,
        ctx: &mut Context<'_>,
        stake_id: u64,
        requester: Address,
    ) -> Result<Withdrawal, AgoraError> {
        let params = self.params.get().clone();
        let stake = self
            .stakes
            .get(&stake_id)
            .cloned()
            .ok_or(AgoraError::StakeNotFound(stake_id))?;
        if stake.returned {
            return Err(AgoraError::StakeAlreadyReturned(stake_id));
        }
        if stake.forfeited {
            return Err(AgoraError::StakeForfeited(stake_id));
        }
        if stake.staker != requester {
            return Err(AgoraError::NotStakeOwner { stake_id, requester });
        }
        let argument = self.argument_of(&stake)?;

        let now = ctx.block_time();
        let periods = elapsed_periods(stake.created_time, now, params.period_secs);
        let interest = accrued_interest(stake.amount.amount, &params.interest_rate, periods)?;
        let split = split_interest(interest, &params.creator_share, stake.staker == argument.creator)?;

        let denom = stake.amount.denom.clone();
        let staker_interest = Coin::new(denom.clone(), split.staker);
        let creator_interest = Coin::new(denom.clone(), split.creator);
        let payout = stake
            .amount
            .checked_add(&staker_interest)?
            .checked_add(&creator_interest)?;
        let available = ctx.bank.module_balance(STAKES_POOL, &denom)?;
        if !available.is_gte(&payout) {
            return Err(AgoraError::InsufficientPoolFunds {
                pool: STAKES_POOL.to_string(),
                needed: payout,
                available,
            });
        }
        let new_total = argument.total_stake.checked_sub(&stake.amount)?;

        ctx.bank.send_from_module_to_account(
            STAKES_POOL,
            &stake.staker,
            &stake.amount,
            stake.stake_type.returned_kind(),
            stake_id,
        )?;
        if !staker_interest.is_zero() {
            let kind = match stake.stake_type {
                StakeType::Upvote => TransactionKind::InterestUpvoteGiven,
                StakeType::Backing | StakeType::Challenge => TransactionKind::InterestArgumentCreation,
            };
            ctx.bank
                .send_from_module_to_account(STAKES_POOL, &stake.staker, &staker_interest, kind, stake_id)?;
        }
        if !creator_interest.is_zero() {
            ctx.bank.send_from_module_to_account(
                STAKES_POOL,
                &argument.creator,
                &creator_interest,
                TransactionKind::InterestUpvoteReceived,
                stake_id,
            )?;
        }
        subtract_from_claim(ctx, argument.claim_id, argument.stake_type, &stake.amount)?;

        self.credit_earned(&stake.staker, &stake.community_id, split.staker)?;
        self.credit_earned(&argument.creator, &stake.community_id, split.creator)?;
        if let Some(stored) = self.arguments.get_mut(&argument.id) {
            stored.total_stake = new_total;
        }
        if let Some(stored) = self.stakes.get_mut(&stake_id) {
            stored.returned = true;
        }

        tracing::info!(
            stake_id,
            %requester,
            principal = %stake.amount,
            interest,
            periods,
            "stake withdrawn"
        );
        Ok(Withdrawal {
            stake_id,
            principal: stake.amount,
            interest: Coin::new(denom, interest),
            staker_interest,
            creator_interest,
        })
    }

    /// Add a staking admin. The requester must be an admin.
    pub fn add_admin(&mut self, address: Address, requester: &Address) -> Result<(), AgoraError> {
        self.params.add_admin(address, requester)
    }

    /// Remove a staking admin. Self-removal is allowed, except for the last admin.
    pub fn remove_admin(&mut self, address: &Address, requester: &Address) -> Result<(), AgoraError> {
        self.params.remove_admin(address, requester)
    }

    /// Apply a sparse parameter update. The admin set is never touched.
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

    /// Flag an argument as unhelpful. Returns `false` if it already was.
    pub fn mark_unhelpful(&mut self, argument_id: u64) -> Result<bool, AgoraError> {
        let argument = self
            .arguments
            .get_mut(&argument_id)
            .ok_or(AgoraError::ArgumentNotFound(argument_id))?;
        if argument.is_unhelpful {
            return Ok(false);
        }
        argument.is_unhelpful = true;
        tracing::info!(argument_id, "argument marked unhelpful");
        Ok(true)
    }

    /// Take a live stake out of circulation without paying it back.
    ///
    /// Argument and claim totals drop by the principal. The escrowed tokens
    /// stay in the stakes pool; the caller decides what to do with them.
    pub fn forfeit_stake(&mut self, ctx: &mut Context<'_>, stake_id: u64) -> Result<Stake, AgoraError> {
        let stake = self
            .stakes
            .get(&stake_id)
            .cloned()
            .ok_or(AgoraError::StakeNotFound(stake_id))?;
        if stake.returned {
            return Err(AgoraError::StakeAlreadyReturned(stake_id));
        }
        if stake.forfeited {
            return Err(AgoraError::StakeForfeited(stake_id));
        }
        let argument = self.argument_of(&stake)?;
        let new_total = argument.total_stake.checked_sub(&stake.amount)?;
        subtract_from_claim(ctx, argument.claim_id, argument.stake_type, &stake.amount)?;

        if let Some(stored) = self.arguments.get_mut(&argument.id) {
            stored.total_stake = new_total;
        }
        let stored = self
            .stakes
            .get_mut(&stake_id)
            .ok_or(AgoraError::StakeNotFound(stake_id))?;
        stored.forfeited = true;
        tracing::info!(stake_id, staker = %stored.staker, amount = %stored.amount, "stake forfeited");
        Ok(stored.clone())
    }

    fn argument_of(&self, stake: &Stake) -> Result<Argument, AgoraError> {
        self.arguments.get(&stake.argument_id).cloned().ok_or_else(|| {
            AgoraError::InvariantViolation(format!(
                "stake {} references missing argument {}",
                stake.id, stake.argument_id
            ))
        })
    }

    fn insert_stake(
        &mut self,
        argument_id: u64,
        community_id: &str,
        staker: Address,
        amount: Coin,
        stake_type: StakeType,
        created_time: DateTime<Utc>,
    ) -> Stake {
        let stake = Stake {
            id: self.next_stake_id,
            argument_id,
            community_id: community_id.to_string(),
            staker,
            amount,
            stake_type,
            created_time,
            returned: false,
            forfeited: false,
        };
        self.next_stake_id += 1;
        self.stakes.insert(stake.id, stake.clone());
        stake
    }

    fn credit_earned(&mut self, address: &Address, community_id: &str, amount: u64) -> Result<(), AgoraError> {
        if amount == 0 {
            return Ok(());
        }
        self.earned
            .entry(*address)
            .or_default()
            .add(&Coin::new(community_id, amount))
    }
}

impl Default for StakingKeeper {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

fn check_lengths(params: &Params, body: &str, summary: &str) -> Result<(), AgoraError> {
    let len = body.chars().count();
    if len < params.argument_body_min_length || len > params.argument_body_max_length {
        return Err(AgoraError::InvalidBodyLength {
            len,
            min: params.argument_body_min_length,
            max: params.argument_body_max_length,
        });
    }
    let len = summary.chars().count();
    if len < params.argument_summary_min_length || len > params.argument_summary_max_length {
        return Err(AgoraError::InvalidSummaryLength {
            len,
            min: params.argument_summary_min_length,
            max: params.argument_summary_max_length,
        });
    }
    Ok(())
}

fn ensure_balance(ctx: &Context<'_>, address: &Address, needed: &Coin) -> Result<(), AgoraError> {
    let available = ctx.bank.balance(address, &needed.denom);
    if !available.is_gte(needed) {
        return Err(AgoraError::InsufficientFunds {
            address: *address,
            needed: needed.clone(),
            available,
        });
    }
    Ok(())
}

fn add_to_claim(ctx: &mut Context<'_>, claim_id: u64, stance: Stance, amount: &Coin) -> Result<(), AgoraError> {
    match stance {
        Stance::Backing => ctx.claims.add_backing_stake(claim_id, amount),
        Stance::Challenge => ctx.claims.add_challenge_stake(claim_id, amount),
    }
}

fn subtract_from_claim(
    ctx: &mut Context<'_>,
    claim_id: u64,
    stance: Stance,
    amount: &Coin,
) -> Result<(), AgoraError> {
    match stance {
        Stance::Backing => ctx.claims.subtract_backing_stake(claim_id, amount),
        Stance::Challenge => ctx.claims.subtract_challenge_stake(claim_id, amount),
    }
}
