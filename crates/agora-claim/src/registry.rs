// crates/agora-claim/src/registry.rs
//
// In-memory claim registry implementing `ClaimKeeper`.
//
// Claims are created by an outer claim-creation flow (`create_claim`), with
// ids assigned sequentially from 1. Totals only ever move by the exact stake
// amounts the staking engine reports; an underflow is an invariant violation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::traits::ClaimKeeper;
use agora_core::{Address, Claim, Coin};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone)]
pub struct ClaimRegistry {
    claims: BTreeMap<u64, Claim>,
    next_id: u64,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self {
            claims: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a new claim with zero totals.
    pub fn create_claim(
        &mut self,
        community_id: &str,
        body: &str,
        creator: Address,
        source: &str,
        created_time: DateTime<Utc>,
    ) -> Claim {
        let claim = Claim::new(self.next_id, community_id, body, creator, source, created_time);
        self.next_id += 1;
        self.claims.insert(claim.id, claim.clone());
        tracing::info!(claim_id = claim.id, community = %claim.community_id, "claim created");
        claim
    }

    pub fn claims(&self) -> Vec<Claim> {
        self.claims.values().cloned().collect()
    }

    pub fn community_claims(&self, community_id: &str) -> Vec<Claim> {
        self.claims
            .values()
            .filter(|c| c.community_id == community_id)
            .cloned()
            .collect()
    }

    fn claim_mut(&mut self, id: u64) -> Result<&mut Claim, AgoraError> {
        self.claims.get_mut(&id).ok_or(AgoraError::ClaimNotFound(id))
    }

    pub fn import_genesis(genesis: &GenesisState) -> Result<Self, AgoraError> {
        let mut registry = Self::new();
        for claim in &genesis.claims {
            if registry.claims.insert(claim.id, claim.clone()).is_some() {
                return Err(AgoraError::InvariantViolation(format!(
                    "duplicate claim id {} in genesis",
                    claim.id
                )));
            }
            registry.next_id = registry.next_id.max(claim.id + 1);
        }
        Ok(registry)
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            claims: self.claims(),
        }
    }
}

impl Default for ClaimRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimKeeper for ClaimRegistry {
    fn claim(&self, id: u64) -> Option<Claim> {
        self.claims.get(&id).cloned()
    }

    fn add_backing_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError> {
        let claim = self.claim_mut(id)?;
        claim.total_backed = claim.total_backed.checked_add(amount)?;
        Ok(())
    }

    fn add_challenge_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError> {
        let claim = self.claim_mut(id)?;
        claim.total_challenged = claim.total_challenged.checked_add(amount)?;
        Ok(())
    }

    fn subtract_backing_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError> {
        let claim = self.claim_mut(id)?;
        claim.total_backed = claim.total_backed.checked_sub(amount)?;
        Ok(())
    }

    fn subtract_challenge_stake(&mut self, id: u64, amount: &Coin) -> Result<(), AgoraError> {
        let claim = self.claim_mut(id)?;
        claim.total_challenged = claim.total_challenged.checked_sub(amount)?;
        Ok(())
    }

    fn set_first_argument_time(&mut self, id: u64, time: DateTime<Utc>) -> Result<(), AgoraError> {
        let claim = self.claim_mut(id)?;
        claim.first_argument_time = Some(time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_claim() -> (ClaimRegistry, u64) {
        let mut registry = ClaimRegistry::new();
        let claim = registry.create_claim("crypto", "Bitcoin is a store of value", Address::random(), "", Utc::now());
        (registry, claim.id)
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = ClaimRegistry::new();
        let a = registry.create_claim("crypto", "a", Address::random(), "", Utc::now());
        let b = registry.create_claim("crypto", "b", Address::random(), "", Utc::now());
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn test_add_and_subtract_totals() {
        let (mut registry, id) = registry_with_claim();
        registry.add_backing_stake(id, &Coin::tokens(50)).unwrap();
        registry.add_challenge_stake(id, &Coin::tokens(10)).unwrap();
        registry.subtract_backing_stake(id, &Coin::tokens(20)).unwrap();

        let claim = registry.claim(id).unwrap();
        assert_eq!(claim.total_backed, Coin::tokens(30));
        assert_eq!(claim.total_challenged, Coin::tokens(10));
    }

    #[test]
    fn test_subtract_below_zero_is_invariant_violation() {
        let (mut registry, id) = registry_with_claim();
        registry.add_challenge_stake(id, &Coin::tokens(5)).unwrap();
        let err = registry.subtract_challenge_stake(id, &Coin::tokens(6)).unwrap_err();
        assert!(matches!(err, AgoraError::InvariantViolation(_)));
        // Unchanged after the failure.
        assert_eq!(registry.claim(id).unwrap().total_challenged, Coin::tokens(5));
    }

    #[test]
    fn test_unknown_claim() {
        let mut registry = ClaimRegistry::new();
        assert!(registry.claim(9).is_none());
        assert_eq!(
            registry.add_backing_stake(9, &Coin::tokens(1)).unwrap_err(),
            AgoraError::ClaimNotFound(9)
        );
    }

    #[test]
    fn test_first_argument_time() {
        let (mut registry, id) = registry_with_claim();
        assert!(registry.claim(id).unwrap().first_argument_time.is_none());
        let now = Utc::now();
        registry.set_first_argument_time(id, now).unwrap();
        assert_eq!(registry.claim(id).unwrap().first_argument_time, Some(now));
    }

    #[test]
    fn test_genesis_keeps_id_sequence() {
        let (registry, _) = registry_with_claim();
        let mut restored = ClaimRegistry::import_genesis(&registry.export_genesis()).unwrap();
        let next = restored.create_claim("crypto", "next", Address::random(), "", Utc::now());
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_genesis_rejects_duplicate_ids() {
        let (registry, _) = registry_with_claim();
        let mut genesis = registry.export_genesis();
        genesis.claims.push(genesis.claims[0].clone());
        assert!(ClaimRegistry::import_genesis(&genesis).is_err());
    }
}
