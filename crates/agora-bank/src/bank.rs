// crates/agora-bank/src/bank.rs
//
// Token custody for the Agora economy.
//
// Holds account balances and named module pools:
//   - `user_stakes_pool`: escrow for every stake; pays back principal and
//     interest on withdrawal; slashed principal is burned from here.
//   - `user_reward_pool`: pays slash rewards.
//
// Pools must be registered before use and are funded by minting. The bank
// tracks total supply and the cumulative burned amount so that
//   sum(accounts) + sum(pools) == supply
//   supply + burned == genesis supply + minted
// can be checked at any time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::traits::BankKeeper;
use agora_core::transaction::TransactionKind;
use agora_core::{Address, Coin, Coins};

pub use agora_core::pool::{REWARD_POOL, STAKES_POOL};

/// One side of a token movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Party {
    Account(Address),
    Module(String),
    /// Newly minted or burned supply.
    Supply,
}

/// A single logged token movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    pub reference_id: u64,
    pub from: Party,
    pub to: Party,
    pub amount: Coin,
}

/// Genesis balance of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub address: Address,
    pub coins: Coins,
}

/// Genesis balance of a module pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBalance {
    pub name: String,
    pub coins: Coins,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub module_accounts: Vec<ModuleBalance>,
    /// Cumulative minted amount carried across exports.
    #[serde(default)]
    pub minted: Coins,
    /// Cumulative burned amount carried across exports.
    #[serde(default)]
    pub burned: Coins,
    /// Every logged token movement, oldest first.
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// In-memory token custody.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    accounts: BTreeMap<Address, Coins>,
    modules: BTreeMap<String, Coins>,
    supply: Coins,
    minted: Coins,
    burned: Coins,
    log: Vec<TransactionRecord>,
}

impl Bank {
    /// Create a bank with no accounts and no pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bank with the two pools the engines use.
    pub fn with_default_pools() -> Self {
        let mut bank = Self::new();
        bank.register_module(STAKES_POOL);
        bank.register_module(REWARD_POOL);
        bank
    }

    /// Register an empty module pool. No-op if it already exists.
    pub fn register_module(&mut self, name: &str) {
        self.modules.entry(name.to_string()).or_default();
    }

    /// Credit an account directly, growing supply. Genesis and test funding only.
    pub fn fund_account(&mut self, address: &Address, amount: &Coin) -> Result<(), AgoraError> {
        self.accounts.entry(*address).or_default().add(amount)?;
        self.supply.add(amount)?;
        Ok(())
    }

    pub fn total_supply(&self) -> &Coins {
        &self.supply
    }

    pub fn minted(&self) -> &Coins {
        &self.minted
    }

    pub fn burned(&self) -> &Coins {
        &self.burned
    }

    /// Sum of one denomination across every account and pool.
    pub fn total_held(&self, denom: &str) -> u64 {
        self.accounts
            .values()
            .chain(self.modules.values())
            .map(|c| c.amount_of(denom))
            .sum()
    }

    /// Token movements touching an account, oldest first.
    pub fn transactions_for(&self, address: &Address) -> Vec<&TransactionRecord> {
        let party = Party::Account(*address);
        self.log
            .iter()
            .filter(|r| r.from == party || r.to == party)
            .collect()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.log
    }

    /// Detach the transaction log, leaving it empty.
    ///
    /// Pair with [`Bank::prepend_log`] to run work on a copy of the bank
    /// without copying the log.
    pub fn take_log(&mut self) -> Vec<TransactionRecord> {
        std::mem::take(&mut self.log)
    }

    /// Put `earlier` records back in front of whatever was logged since.
    pub fn prepend_log(&mut self, earlier: Vec<TransactionRecord>) {
        let since = std::mem::replace(&mut self.log, earlier);
        self.log.extend(since);
    }

    fn module_mut(&mut self, pool: &str) -> Result<&mut Coins, AgoraError> {
        self.modules
            .get_mut(pool)
            .ok_or_else(|| AgoraError::ModuleNotFound(pool.to_string()))
    }

    fn record(&mut self, kind: TransactionKind, reference_id: u64, from: Party, to: Party, amount: &Coin) {
        self.log.push(TransactionRecord {
            kind,
            reference_id,
            from,
            to,
            amount: amount.clone(),
        });
    }

    pub fn import_genesis(genesis: &GenesisState) -> Result<Self, AgoraError> {
        let mut bank = Self::new();
        for balance in &genesis.balances {
            for coin in balance.coins.iter() {
                bank.fund_account(&balance.address, &coin)?;
            }
        }
        for module in &genesis.module_accounts {
            bank.register_module(&module.name);
            for coin in module.coins.iter() {
                bank.module_mut(&module.name)?.add(&coin)?;
                bank.supply.add(&coin)?;
            }
        }
        bank.minted = genesis.minted.clone();
        bank.burned = genesis.burned.clone();
        bank.log = genesis.transactions.clone();
        Ok(bank)
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            balances: self
                .accounts
                .iter()
                .filter(|(_, coins)| !coins.is_empty())
                .map(|(address, coins)| Balance {
                    address: *address,
                    coins: coins.clone(),
                })
                .collect(),
            module_accounts: self
                .modules
                .iter()
                .map(|(name, coins)| ModuleBalance {
                    name: name.clone(),
                    coins: coins.clone(),
                })
                .collect(),
            minted: self.minted.clone(),
            burned: self.burned.clone(),
            transactions: self.log.clone(),
        }
    }
}

impl BankKeeper for Bank {
    fn balance(&self, address: &Address, denom: &str) -> Coin {
        let amount = self
            .accounts
            .get(address)
            .map(|c| c.amount_of(denom))
            .unwrap_or(0);
        Coin::new(denom, amount)
    }

    fn balances(&self, address: &Address) -> Coins {
        self.accounts.get(address).cloned().unwrap_or_default()
    }

    fn module_balance(&self, pool: &str, denom: &str) -> Result<Coin, AgoraError> {
        let coins = self
            .modules
            .get(pool)
            .ok_or_else(|| AgoraError::ModuleNotFound(pool.to_string()))?;
        Ok(Coin::new(denom, coins.amount_of(denom)))
    }

    fn send_from_account_to_module(
        &mut self,
        from: &Address,
        pool: &str,
        amount: &Coin,
        kind: TransactionKind,
        reference_id: u64,
    ) -> Result<(), AgoraError> {
        if !self.modules.contains_key(pool) {
            return Err(AgoraError::ModuleNotFound(pool.to_string()));
        }
        let available = self.balance(from, &amount.denom);
        if !available.is_gte(amount) {
            return Err(AgoraError::InsufficientFunds {
                address: *from,
                needed: amount.clone(),
                available,
            });
        }
        self.accounts.entry(*from).or_default().sub(amount)?;
        self.module_mut(pool)?.add(amount)?;
        self.record(kind, reference_id, Party::Account(*from), Party::Module(pool.to_string()), amount);
        Ok(())
    }

    fn send_from_module_to_account(
        &mut self,
        pool: &str,
        to: &Address,
        amount: &Coin,
        kind: TransactionKind,
        reference_id: u64,
    ) -> Result<(), AgoraError> {
        let available = self.module_balance(pool, &amount.denom)?;
        if !available.is_gte(amount) {
            return Err(AgoraError::InsufficientPoolFunds {
                pool: pool.to_string(),
                needed: amount.clone(),
                available,
            });
        }
        self.module_mut(pool)?.sub(amount)?;
        self.accounts.entry(*to).or_default().add(amount)?;
        self.record(kind, reference_id, Party::Module(pool.to_string()), Party::Account(*to), amount);
        Ok(())
    }

    fn mint_coins(&mut self, pool: &str, amount: &Coin) -> Result<(), AgoraError> {
        self.module_mut(pool)?.add(amount)?;
        self.supply.add(amount)?;
        self.minted.add(amount)?;
        self.record(TransactionKind::Mint, 0, Party::Supply, Party::Module(pool.to_string()), amount);
        tracing::debug!(pool, %amount, "minted coins");
        Ok(())
    }

    fn burn_coins(&mut self, pool: &str, amount: &Coin) -> Result<(), AgoraError> {
        let available = self.module_balance(pool, &amount.denom)?;
        if !available.is_gte(amount) {
            return Err(AgoraError::InsufficientPoolFunds {
                pool: pool.to_string(),
                needed: amount.clone(),
                available,
            });
        }
        self.module_mut(pool)?.sub(amount)?;
        self.supply.sub(amount)?;
        self.burned.add(amount)?;
        self.record(TransactionKind::Burn, 0, Party::Module(pool.to_string()), Party::Supply, amount);
        tracing::debug!(pool, %amount, "burned coins");
        Ok(())
    }
}
