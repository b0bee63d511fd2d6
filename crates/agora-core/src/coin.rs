// crates/agora-core/src/coin.rs
//
// Coin amounts and multi-denomination coin sets.
//
// The native stake denomination is "uagr" (micro-AGR). 1 AGR = 10^6 uagr.
// All internal accounting uses the smallest unit and checked integer
// arithmetic; any overflow or underflow is an invariant violation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decimal::Dec;
use crate::error::AgoraError;

/// The native denomination used for stakes, penalties, and rewards.
pub const STAKE_DENOM: &str = "uagr";

/// Number of base units in one whole AGR token.
pub const UNITS_PER_TOKEN: u64 = 1_000_000;

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// An amount of the native stake denomination, in base units.
    pub fn stake(amount: u64) -> Self {
        Self::new(STAKE_DENOM, amount)
    }

    /// A whole number of AGR tokens. For constants and tests; use
    /// [`Coin::checked_tokens`] for amounts from outside input.
    pub fn tokens(whole: u64) -> Self {
        Self::stake(whole * UNITS_PER_TOKEN)
    }

    /// A whole number of AGR tokens, rejecting counts whose base-unit amount
    /// does not fit in a `u64`.
    pub fn checked_tokens(whole: u64) -> Result<Self, AgoraError> {
        let amount = whole.checked_mul(UNITS_PER_TOKEN).ok_or_else(|| {
            AgoraError::InvalidParams(format!(
                "{} tokens exceeds the largest representable amount of {} tokens",
                whole,
                u64::MAX / UNITS_PER_TOKEN
            ))
        })?;
        Ok(Self::stake(amount))
    }

    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// `self >= other`, requiring matching denominations.
    pub fn is_gte(&self, other: &Coin) -> bool {
        self.denom == other.denom && self.amount >= other.amount
    }

    pub fn checked_add(&self, other: &Coin) -> Result<Coin, AgoraError> {
        self.ensure_same_denom(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("coin overflow: {} + {}", self, other))
        })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Subtract, failing loudly instead of clamping at zero.
    pub fn checked_sub(&self, other: &Coin) -> Result<Coin, AgoraError> {
        self.ensure_same_denom(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("negative coin: {} - {}", self, other))
        })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Multiply by a decimal and truncate toward zero.
    pub fn mul_dec_truncate(&self, dec: &Dec) -> Result<Coin, AgoraError> {
        Ok(Coin::new(self.denom.clone(), dec.mul_truncate(self.amount)?))
    }

    /// Multiply by an integer factor.
    pub fn checked_mul(&self, factor: u64) -> Result<Coin, AgoraError> {
        let amount = self.amount.checked_mul(factor).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("coin overflow: {} * {}", self, factor))
        })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    fn ensure_same_denom(&self, other: &Coin) -> Result<(), AgoraError> {
        if self.denom != other.denom {
            return Err(AgoraError::InvariantViolation(format!(
                "denomination mismatch: {} vs {}",
                self.denom, other.denom
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins keyed by denomination. Zero entries are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(BTreeMap<String, u64>);

impl Coins {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self, AgoraError> {
        let mut set = Self::new();
        for coin in coins {
            set.add(&coin)?;
        }
        Ok(set)
    }

    pub fn add(&mut self, coin: &Coin) -> Result<(), AgoraError> {
        if coin.is_zero() {
            return Ok(());
        }
        let entry = self.0.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.checked_add(coin.amount).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("coin set overflow adding {}", coin))
        })?;
        Ok(())
    }

    pub fn sub(&mut self, coin: &Coin) -> Result<(), AgoraError> {
        if coin.is_zero() {
            return Ok(());
        }
        let held = self.amount_of(&coin.denom);
        let remaining = held.checked_sub(coin.amount).ok_or_else(|| {
            AgoraError::InvariantViolation(format!(
                "negative coin set: {}{} - {}",
                held, coin.denom, coin
            ))
        })?;
        if remaining == 0 {
            self.0.remove(&coin.denom);
        } else {
            self.0.insert(coin.denom.clone(), remaining);
        }
        Ok(())
    }

    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }

    /// Sum of all denominations, treated 1:1.
    pub fn total_amount(&self) -> Result<u64, AgoraError> {
        self.0.values().try_fold(0u64, |acc, v| {
            acc.checked_add(*v).ok_or_else(|| {
                AgoraError::InvariantViolation("coin set total overflow".to_string())
            })
        })
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_scale() {
        assert_eq!(Coin::tokens(50).amount, 50_000_000);
        assert_eq!(Coin::tokens(50).denom, STAKE_DENOM);
    }

    #[test]
    fn test_checked_tokens_rejects_overflow() {
        assert_eq!(Coin::checked_tokens(50).unwrap(), Coin::tokens(50));
        let max = u64::MAX / UNITS_PER_TOKEN;
        assert_eq!(Coin::checked_tokens(max).unwrap().amount, max * UNITS_PER_TOKEN);
        let err = Coin::checked_tokens(max + 1).unwrap_err();
        assert!(matches!(err, AgoraError::InvalidParams(_)));
        assert!(Coin::checked_tokens(u64::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Coin::tokens(50).to_string(), "50000000uagr");
    }

    #[test]
    fn test_checked_sub_fails_loudly() {
        let a = Coin::tokens(1);
        let b = Coin::tokens(2);
        let err = a.checked_sub(&b).unwrap_err();
        assert!(matches!(err, AgoraError::InvariantViolation(_)));
    }

    #[test]
    fn test_denom_mismatch() {
        let a = Coin::new("crypto", 1);
        let b = Coin::stake(1);
        assert!(a.checked_add(&b).is_err());
        assert!(!a.is_gte(&b));
    }

    #[test]
    fn test_mul_dec_truncate() {
        let coin = Coin::tokens(50);
        let quarter = Dec::new_with_prec(25, 2).unwrap();
        assert_eq!(coin.mul_dec_truncate(&quarter).unwrap().amount, 12_500_000);
    }

    #[test]
    fn test_coins_add_and_total() {
        let mut coins = Coins::new();
        coins.add(&Coin::new("crypto", 10)).unwrap();
        coins.add(&Coin::new("random", 30)).unwrap();
        coins.add(&Coin::new("crypto", 5)).unwrap();
        assert_eq!(coins.amount_of("crypto"), 15);
        assert_eq!(coins.total_amount().unwrap(), 45);
        assert_eq!(coins.to_string(), "15crypto,30random");
    }

    #[test]
    fn test_coins_skip_zero_and_remove_emptied() {
        let mut coins = Coins::new();
        coins.add(&Coin::new("crypto", 0)).unwrap();
        assert!(coins.is_empty());
        coins.add(&Coin::new("crypto", 3)).unwrap();
        coins.sub(&Coin::new("crypto", 3)).unwrap();
        assert!(coins.is_empty());
        assert!(coins.sub(&Coin::new("crypto", 1)).is_err());
    }
}
