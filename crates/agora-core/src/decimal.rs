// crates/agora-core/src/decimal.rs
//
// Unsigned fixed-point decimal with 18 fractional digits.
//
// Interest rates, creator shares, and reward fractions are all `Dec`. No
// binary floating point is used anywhere in the money path, so results are
// reproducible bit-for-bit across hosts.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgoraError;

/// Number of fractional decimal digits.
pub const DEC_PRECISION: u32 = 18;

const DEC_ONE: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(u128);

impl Dec {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(DEC_ONE)
    }

    /// Build from the raw scaled representation (value * 10^18).
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub fn from_int(value: u64) -> Self {
        Self(value as u128 * DEC_ONE)
    }

    /// `value * 10^-prec`, e.g. `new_with_prec(105, 2)` is 1.05.
    pub fn new_with_prec(value: u64, prec: u32) -> Result<Self, AgoraError> {
        if prec > DEC_PRECISION {
            return Err(AgoraError::InvalidParams(format!(
                "decimal precision {} exceeds {}",
                prec, DEC_PRECISION
            )));
        }
        let scale = 10u128.pow(DEC_PRECISION - prec);
        Ok(Self(value as u128 * scale))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_mul(&self, rhs: &Dec) -> Result<Dec, AgoraError> {
        let product = self
            .0
            .checked_mul(rhs.0)
            .ok_or_else(|| AgoraError::InvariantViolation(format!("decimal overflow: {} * {}", self, rhs)))?;
        Ok(Dec(product / DEC_ONE))
    }

    /// Multiply an integer amount and truncate toward zero.
    pub fn mul_truncate(&self, amount: u64) -> Result<u64, AgoraError> {
        let scaled = (amount as u128).checked_mul(self.0).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("decimal overflow: {} * {}", amount, self))
        })?;
        u64::try_from(scaled / DEC_ONE).map_err(|_| {
            AgoraError::InvariantViolation(format!("amount overflow: {} * {}", amount, self))
        })
    }

    /// Multiply an integer amount and truncate toward zero, clamping at
    /// `u64::MAX` instead of failing.
    pub fn mul_truncate_saturating(&self, amount: u64) -> u64 {
        (amount as u128)
            .checked_mul(self.0)
            .map_or(u64::MAX, |scaled| u64::try_from(scaled / DEC_ONE).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / DEC_ONE,
            self.0 % DEC_ONE,
            width = DEC_PRECISION as usize
        )
    }
}

impl FromStr for Dec {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AgoraError::InvalidParams(format!("invalid decimal: {:?}", s));
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > DEC_PRECISION as usize
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = DEC_PRECISION as usize);
            padded.parse().map_err(|_| invalid())?
        };
        let raw = whole
            .checked_mul(DEC_ONE)
            .and_then(|w| w.checked_add(frac_raw))
            .ok_or_else(invalid)?;
        Ok(Dec(raw))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
