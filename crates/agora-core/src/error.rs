// crates/agora-core/src/error.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::coin::Coin;

/// Coarse error categories surfaced to the host runtime and to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A claim, argument, stake, slash, or module account does not exist.
    NotFound,
    /// Length, limit, reason, or parameter validation failed.
    ValidationFailed,
    /// The caller is not allowed to perform the action.
    Unauthorized,
    /// An account balance cannot cover the requested amount.
    InsufficientFunds,
    /// A module pool cannot cover the requested payout.
    InsufficientPoolFunds,
    /// The action was already applied (stake returned, duplicate slash).
    AlreadyProcessed,
    /// Internal bookkeeping would become inconsistent. Aborts the command.
    InvariantViolation,
}

/// Protocol-wide error types for the Agora economy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgoraError {
    #[error("Claim {0} not found")]
    ClaimNotFound(u64),

    #[error("Argument {0} not found")]
    ArgumentNotFound(u64),

    #[error("Stake {0} not found")]
    StakeNotFound(u64),

    #[error("Slash {0} not found")]
    SlashNotFound(u64),

    /// Slash target does not resolve to an argument.
    #[error("Invalid argument id {0}")]
    InvalidArgument(u64),

    #[error("Module account {0} not found")]
    ModuleNotFound(String),

    #[error("Claim {claim_id} already has the maximum of {max} arguments")]
    ClaimArgumentLimitExceeded { claim_id: u64, max: usize },

    #[error("Argument body must be {min}..={max} characters, got {len}")]
    InvalidBodyLength { len: usize, min: usize, max: usize },

    #[error("Argument summary must be {min}..={max} characters, got {len}")]
    InvalidSummaryLength { len: usize, min: usize, max: usize },

    #[error("Argument {0} has been marked unhelpful")]
    ArgumentUnhelpful(u64),

    #[error("Invalid slash reason: {0}")]
    InvalidSlashReason(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Cannot remove {0}: it is the last admin")]
    CannotRemoveLastAdmin(Address),

    #[error("Account {0} is jailed")]
    AccountJailed(Address),

    #[error("Address {0} is not authorised")]
    AddressNotAuthorised(Address),

    #[error("{requester} does not own stake {stake_id}")]
    NotStakeOwner { stake_id: u64, requester: Address },

    #[error("{editor} is not the creator of argument {argument_id}")]
    NotArgumentCreator { argument_id: u64, editor: Address },

    #[error("{0} has not earned enough stake to slash")]
    NotEnoughEarnedStake(Address),

    #[error("Insufficient funds: {address} needs {needed} but holds {available}")]
    InsufficientFunds {
        address: Address,
        needed: Coin,
        available: Coin,
    },

    #[error("Insufficient pool funds: {pool} needs {needed} but holds {available}")]
    InsufficientPoolFunds {
        pool: String,
        needed: Coin,
        available: Coin,
    },

    #[error("Stake {0} has already been returned")]
    StakeAlreadyReturned(u64),

    #[error("Stake {0} was forfeited by punishment")]
    StakeForfeited(u64),

    #[error("Argument already slashed by this creator")]
    AlreadyUnhelpful,

    /// Negative totals, overflow, or dangling references.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AgoraError {
    /// Map this error onto its taxonomy category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgoraError::ClaimNotFound(_)
            | AgoraError::ArgumentNotFound(_)
            | AgoraError::StakeNotFound(_)
            | AgoraError::SlashNotFound(_)
            | AgoraError::InvalidArgument(_)
            | AgoraError::ModuleNotFound(_) => ErrorKind::NotFound,

            AgoraError::ClaimArgumentLimitExceeded { .. }
            | AgoraError::InvalidBodyLength { .. }
            | AgoraError::InvalidSummaryLength { .. }
            | AgoraError::ArgumentUnhelpful(_)
            | AgoraError::InvalidSlashReason(_)
            | AgoraError::InvalidParams(_)
            | AgoraError::CannotRemoveLastAdmin(_)
            | AgoraError::Serialization(_) => ErrorKind::ValidationFailed,

            AgoraError::AccountJailed(_)
            | AgoraError::AddressNotAuthorised(_)
            | AgoraError::NotStakeOwner { .. }
            | AgoraError::NotArgumentCreator { .. }
            | AgoraError::NotEnoughEarnedStake(_) => ErrorKind::Unauthorized,

            AgoraError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AgoraError::InsufficientPoolFunds { .. } => ErrorKind::InsufficientPoolFunds,

            AgoraError::StakeAlreadyReturned(_)
            | AgoraError::StakeForfeited(_)
            | AgoraError::AlreadyUnhelpful => ErrorKind::AlreadyProcessed,

            AgoraError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }
}

impl From<serde_json::Error> for AgoraError {
    fn from(e: serde_json::Error) -> Self {
        AgoraError::Serialization(e.to_string())
    }
}
