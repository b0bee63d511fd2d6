// crates/agora-core/src/traits.rs

use chrono::{DateTime, Utc};

use crate::address::Address;
use crate::claim::Claim;
use crate::coin::{Coin, Coins};
use crate::error::AgoraError;
use crate::transaction::TransactionKind;

/// Token custody: balances, transfers to and from named module pools, and
/// mint/burn against those pools.
///
/// Implemented by agora-bank. Every method either applies fully or returns an
/// error without side effects. Insufficient account balance is reported as
/// `InsufficientFunds`, an underfunded pool as `InsufficientPoolFunds`, and an
/// unknown pool as `ModuleNotFound`.
pub trait BankKeeper: Send + Sync {
    /// Balance of one denomination held by an account.
    fn balance(&self, address: &Address, denom: &str) -> Coin;

    /// All balances held by an account.
    fn balances(&self, address: &Address) -> Coins;

    /// Balance of one denomination held by a module pool.
    fn module_balance(&self, pool: &str, denom: &str) -> Result<Coin, AgoraError>;

    fn send_from_account_to_module(
        &mut self,
        from: &Address,
        pool: &str,
        amount: &Coin,
        kind: TransactionKind,
        reference_id: u64,
    ) -> Result<(), AgoraError>;

    fn send_from_module_to_account(
        &mut self,
        pool: &str,
        to: &Address,
        amount: &Coin,
        kind: TransactionKind,
        reference_id: u64,
    ) -> Result<(), AgoraError>;

    fn mint_coins(&mut self, pool: &str, amount: &Coin) -> Result<(), AgoraError>;

    fn burn_coins(&mut self, pool: &str, amount: &Coin) -> Result<(), AgoraError>;
}

/// Account jail status.
///
/// Implemented by agora-bank's `Accounts`; the staking tests also provide a
/// fake with a forced-failure switch.
pub trait AccountKeeper: Send + Sync {
    fn is_jailed(&self, address: &Address) -> Result<bool, AgoraError>;

    fn unjail(&mut self, address: &Address) -> Result<(), AgoraError>;

    /// Jail an account until the given time.
    fn jail(&mut self, address: &Address, until: DateTime<Utc>) -> Result<(), AgoraError>;

    /// Record one more punishment against an account. Returns the new count.
    fn increment_slash_count(&mut self, address: &Address) -> Result<u32, AgoraError>;
}

/// Claim bookkeeping consulted and mutated by the staking engine.
///
/// Implemented by agora-claim. Subtracting more than a total holds is an
/// `InvariantViolation`, never a silent clamp.
pub trait ClaimKeeper: Send + Sync {
    fn claim(&self, id: u64) -> Option<Claim>;

    fn add_backing_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError>;

    fn add_challenge_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError>;

    fn subtract_backing_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError>;

    fn subtract_challenge_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError>;

    fn set_first_argument_time(&mut self, id: u64, time: DateTime<Utc>) -> Result<(), AgoraError>;
}
