// crates/agora-slashing/src/test_support.rs
//
// Fixtures for the slashing unit tests: funded pools, one claim, two slash
// admins, and helpers to seed earned coins.

use chrono::{DateTime, TimeZone, Utc};

use agora_bank::{Accounts, Bank};
use agora_claim::ClaimRegistry;
use agora_core::traits::BankKeeper;
use agora_core::{
    Address, AdminSet, BlockInfo, Coin, Coins, Context, REWARD_POOL, STAKES_POOL, STAKE_DENOM,
    UNITS_PER_TOKEN,
};
use agora_staking::{Argument, Stance, StakingKeeper, UserEarnedCoins};

use crate::keeper::SlashingKeeper;
use crate::params::Params;

const BODY: &str = "Proof of work secures the network against rewriting history.";
const SUMMARY: &str = "Proof of work keeps history intact";

pub struct TestEnv {
    pub bank: Bank,
    pub accounts: Accounts,
    pub claims: ClaimRegistry,
    pub staking: StakingKeeper,
    pub slashing: SlashingKeeper,
    pub now: DateTime<Utc>,
    pub claim_id: u64,
    pub admins: [Address; 2],
}

impl TestEnv {
    pub fn new() -> Self {
        let admins = [Address::new([1u8; 20]), Address::new([2u8; 20])];
        let mut bank = Bank::with_default_pools();
        bank.mint_coins(STAKES_POOL, &Coin::tokens(10_000)).unwrap();
        bank.mint_coins(REWARD_POOL, &Coin::tokens(1_000)).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut claims = ClaimRegistry::new();
        let claim = claims.create_claim("crypto", "Bitcoin is digital gold", admins[0], "", now);

        let params = Params {
            slash_admins: AdminSet::new(admins.to_vec()),
            ..Params::default()
        };
        Self {
            bank,
            accounts: Accounts::new(),
            claims,
            staking: StakingKeeper::default(),
            slashing: SlashingKeeper::new(params),
            now,
            claim_id: claim.id,
            admins,
        }
    }

    pub fn funded_user(&mut self, tokens: u64) -> Address {
        let address = Address::random();
        self.bank.fund_account(&address, &Coin::tokens(tokens)).unwrap();
        address
    }

    /// A fresh address that has earned `tokens` AGR of interest in "crypto".
    pub fn earner(&mut self, tokens: u64) -> Address {
        let address = Address::random();
        let mut genesis = self.staking.export_genesis();
        genesis.users_earnings.push(UserEarnedCoins {
            address,
            coins: Coins::from_coins([Coin::new("crypto", tokens * UNITS_PER_TOKEN)]).unwrap(),
        });
        self.staking = StakingKeeper::import_genesis(&genesis).unwrap();
        address
    }

    pub fn submit_argument(&mut self, creator: Address, stance: Stance) -> Argument {
        let claim_id = self.claim_id;
        let (staking, _, mut ctx) = self.parts();
        staking
            .submit_argument(&mut ctx, BODY, SUMMARY, creator, claim_id, stance)
            .unwrap()
    }

    pub fn parts(&mut self) -> (&mut StakingKeeper, &mut SlashingKeeper, Context<'_>) {
        let ctx = Context::new(
            BlockInfo::new(1, self.now),
            &mut self.bank,
            &mut self.accounts,
            &mut self.claims,
        );
        (&mut self.staking, &mut self.slashing, ctx)
    }

    pub fn balance(&self, address: &Address) -> Coin {
        self.bank.balance(address, STAKE_DENOM)
    }
}
