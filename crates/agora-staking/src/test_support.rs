// crates/agora-staking/src/test_support.rs
//
// Shared fixtures for the staking unit tests: a funded bank, a claim registry
// with one claim, and an account keeper that can be told to fail.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use agora_bank::{Bank, STAKES_POOL};
use agora_claim::ClaimRegistry;
use agora_core::error::AgoraError;
use agora_core::traits::{AccountKeeper, BankKeeper};
use agora_core::{Address, BlockInfo, Coin, Context};

use crate::keeper::StakingKeeper;
use crate::params::Params;

/// Account keeper fake. `fail_next` makes the next `is_jailed` call error.
#[derive(Debug, Default)]
pub struct MockAccounts {
    jailed: BTreeMap<Address, bool>,
    fail_next: AtomicBool,
}

impl MockAccounts {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl AccountKeeper for MockAccounts {
    fn is_jailed(&self, address: &Address) -> Result<bool, AgoraError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AgoraError::InvariantViolation("account store unavailable".to_string()));
        }
        Ok(self.jailed.get(address).copied().unwrap_or(false))
    }

    fn unjail(&mut self, address: &Address) -> Result<(), AgoraError> {
        self.jailed.insert(*address, false);
        Ok(())
    }

    fn jail(&mut self, address: &Address, _until: DateTime<Utc>) -> Result<(), AgoraError> {
        self.jailed.insert(*address, true);
        Ok(())
    }

    fn increment_slash_count(&mut self, _address: &Address) -> Result<u32, AgoraError> {
        Ok(1)
    }
}

pub const BODY: &str = "Proof of work secures the network against rewriting history.";
pub const SUMMARY: &str = "Proof of work keeps history intact";

pub struct TestEnv {
    pub bank: Bank,
    pub accounts: MockAccounts,
    pub claims: ClaimRegistry,
    pub keeper: StakingKeeper,
    pub now: DateTime<Utc>,
    pub claim_id: u64,
    pub admin: Address,
}

impl TestEnv {
    pub fn new() -> Self {
        let admin = Address::new([9u8; 20]);
        let mut params = Params::default();
        params.staking_admins.insert(admin);

        let mut bank = Bank::with_default_pools();
        bank.mint_coins(STAKES_POOL, &Coin::tokens(10_000)).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut claims = ClaimRegistry::new();
        let claim = claims.create_claim("crypto", "Bitcoin is digital gold", admin, "", now);

        Self {
            bank,
            accounts: MockAccounts::default(),
            claims,
            keeper: StakingKeeper::new(params),
            now,
            claim_id: claim.id,
            admin,
        }
    }

    /// A fresh address holding `tokens` AGR.
    pub fn funded_user(&mut self, tokens: u64) -> Address {
        let address = Address::random();
        self.bank.fund_account(&address, &Coin::tokens(tokens)).unwrap();
        address
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }

    /// Split borrows: the keeper plus a context over the collaborators.
    pub fn parts(&mut self) -> (&mut StakingKeeper, Context<'_>) {
        let ctx = Context::new(
            BlockInfo::new(1, self.now),
            &mut self.bank,
            &mut self.accounts,
            &mut self.claims,
        );
        (&mut self.keeper, ctx)
    }

    pub fn balance(&self, address: &Address) -> Coin {
        self.bank.balance(address, agora_core::STAKE_DENOM)
    }
}
