// crates/agora-bank/src/accounts.rs
//
// Account jail status.
//
// An account is jailed by the slashing engine once it has been punished
// `max_slash_count` times. It leaves jail either when enough upvotes land on
// one of its arguments (staking engine calls `unjail`) or when its jail time
// elapses and the host calls `release_expired`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::traits::AccountKeeper;
use agora_core::Address;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub jailed: bool,
    #[serde(default)]
    pub jail_end_time: Option<DateTime<Utc>>,
    /// Number of punishments recorded against this account.
    #[serde(default)]
    pub slash_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: Address,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct Accounts {
    statuses: BTreeMap<Address, AccountStatus>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, address: &Address) -> AccountStatus {
        self.statuses.get(address).cloned().unwrap_or_default()
    }

    /// Unjail every account whose jail time has passed. Returns the released addresses.
    pub fn release_expired(&mut self, now: DateTime<Utc>) -> Vec<Address> {
        let mut released = Vec::new();
        for (address, status) in self.statuses.iter_mut() {
            if status.jailed && status.jail_end_time.is_some_and(|end| end <= now) {
                status.jailed = false;
                status.jail_end_time = None;
                released.push(*address);
            }
        }
        for address in &released {
            tracing::info!(%address, "jail time elapsed, account released");
        }
        released
    }

    pub fn import_genesis(genesis: &GenesisState) -> Self {
        Self {
            statuses: genesis
                .accounts
                .iter()
                .map(|r| (r.address, r.status.clone()))
                .collect(),
        }
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            accounts: self
                .statuses
                .iter()
                .map(|(address, status)| AccountRecord {
                    address: *address,
                    status: status.clone(),
                })
                .collect(),
        }
    }
}

impl AccountKeeper for Accounts {
    fn is_jailed(&self, address: &Address) -> Result<bool, AgoraError> {
        Ok(self.statuses.get(address).is_some_and(|s| s.jailed))
    }

    fn unjail(&mut self, address: &Address) -> Result<(), AgoraError> {
        let status = self.statuses.entry(*address).or_default();
        status.jailed = false;
        status.jail_end_time = None;
        tracing::info!(%address, "account unjailed");
        Ok(())
    }

    fn jail(&mut self, address: &Address, until: DateTime<Utc>) -> Result<(), AgoraError> {
        let status = self.statuses.entry(*address).or_default();
        status.jailed = true;
        status.jail_end_time = Some(until);
        tracing::info!(%address, %until, "account jailed");
        Ok(())
    }

    fn increment_slash_count(&mut self, address: &Address) -> Result<u32, AgoraError> {
        let status = self.statuses.entry(*address).or_default();
        status.slash_count = status.slash_count.checked_add(1).ok_or_else(|| {
            AgoraError::InvariantViolation(format!("slash count overflow for {}", address))
        })?;
        Ok(status.slash_count)
    }
}
