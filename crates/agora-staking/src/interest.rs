// crates/agora-staking/src/interest.rs
//
// Compounding interest on stakes.
//
// A stake's value is multiplied by the interest rate once per whole period
// elapsed since it was created, truncating to base units after each step:
//
//   value_0     = amount
//   value_{k+1} = trunc(value_k * rate)
//   interest    = value_n - amount
//
// The compounded value saturates at u64::MAX. Interest that large can never
// be covered by the stakes pool, so the withdrawal fails on the pool check
// rather than on arithmetic overflow.
//
// Interest on an upvote is split between the argument creator and the
// upvoter: the creator gets trunc(interest * creator_share), the upvoter the
// remainder, so nothing is lost to rounding.

use chrono::{DateTime, Utc};

use agora_core::error::AgoraError;
use agora_core::Dec;

/// Number of whole periods between `created` and `now`. Zero if `now` is not
/// after `created`.
pub fn elapsed_periods(created: DateTime<Utc>, now: DateTime<Utc>, period_secs: u64) -> u64 {
    if period_secs == 0 {
        return 0;
    }
    let elapsed = (now - created).num_seconds();
    if elapsed <= 0 {
        return 0;
    }
    elapsed as u64 / period_secs
}

/// Interest accrued on `amount` after `periods` compounding steps at `rate`.
/// At most `u64::MAX - amount`.
pub fn accrued_interest(amount: u64, rate: &Dec, periods: u64) -> Result<u64, AgoraError> {
    if *rate == Dec::one() {
        return Ok(0);
    }
    let mut value = amount;
    for _ in 0..periods {
        let next = rate.mul_truncate_saturating(value);
        if next == value {
            // Saturated, or too small for truncation to let it grow.
            break;
        }
        value = next;
    }
    value.checked_sub(amount).ok_or_else(|| {
        AgoraError::InvariantViolation(format!("interest rate {} shrank stake of {}", rate, amount))
    })
}

/// How a stake's interest is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestSplit {
    pub creator: u64,
    pub staker: u64,
}

/// Split interest between the argument creator and the staker. When the
/// staker is the creator they receive all of it.
pub fn split_interest(
    interest: u64,
    creator_share: &Dec,
    staker_is_creator: bool,
) -> Result<InterestSplit, AgoraError> {
    if staker_is_creator {
        return Ok(InterestSplit {
            creator: 0,
            staker: interest,
        });
    }
    let creator = creator_share.mul_truncate(interest)?;
    Ok(InterestSplit {
        creator,
        staker: interest - creator,
    })
}
