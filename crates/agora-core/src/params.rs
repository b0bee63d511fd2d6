// crates/agora-core/src/params.rs
//
// Versioned, admin-gated parameter storage.
//
// Each engine keeps its `Params` in a `ParamSubspace` named after the module.
// Every `set` bumps the version. The admin set lives inside the params record
// itself, so authorization is always checked against the set as it is at
// call time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::AgoraError;

/// Ordered set of admin addresses. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminSet(Vec<Address>);

impl AdminSet {
    /// Build from a list, dropping duplicates.
    pub fn new(addresses: Vec<Address>) -> Self {
        let mut set = Self::default();
        for address in addresses {
            set.insert(address);
        }
        set
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    /// Returns `false` if the address was already present.
    pub fn insert(&mut self, address: Address) -> bool {
        if self.contains(&address) {
            return false;
        }
        self.0.push(address);
        true
    }

    /// Returns `false` if the address was not present.
    pub fn remove(&mut self, address: &Address) -> bool {
        let before = self.0.len();
        self.0.retain(|a| a != address);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.0
    }
}

/// Params records that carry their own admin set.
pub trait AdminGoverned {
    fn admins(&self) -> &AdminSet;
    fn admins_mut(&mut self) -> &mut AdminSet;
}

/// A module's parameter namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSubspace<P> {
    namespace: String,
    version: u64,
    params: P,
}

impl<P: Clone + fmt::Debug> ParamSubspace<P> {
    pub fn new(namespace: impl Into<String>, params: P) -> Self {
        Self {
            namespace: namespace.into(),
            version: 1,
            params,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self) -> &P {
        &self.params
    }

    pub fn set(&mut self, params: P) {
        self.params = params;
        self.version += 1;
        tracing::info!(
            module = %self.namespace,
            version = self.version,
            "loaded params: {:?}",
            self.params
        );
    }
}

impl<P: AdminGoverned + Clone + fmt::Debug> ParamSubspace<P> {
    pub fn is_admin(&self, address: &Address) -> bool {
        self.params.admins().contains(address)
    }

    pub fn ensure_admin(&self, requester: &Address) -> Result<(), AgoraError> {
        if !self.is_admin(requester) {
            return Err(AgoraError::AddressNotAuthorised(*requester));
        }
        Ok(())
    }

    /// Add an admin. The requester must already be an admin.
    pub fn add_admin(&mut self, address: Address, requester: &Address) -> Result<(), AgoraError> {
        self.ensure_admin(requester)?;
        let mut updated = self.params.clone();
        if updated.admins_mut().insert(address) {
            tracing::info!(module = %self.namespace, admin = %address, by = %requester, "admin added");
            self.set(updated);
        }
        Ok(())
    }

    /// Remove an admin. Self-removal is allowed, emptying the set is not.
    pub fn remove_admin(&mut self, address: &Address, requester: &Address) -> Result<(), AgoraError> {
        self.ensure_admin(requester)?;
        let mut updated = self.params.clone();
        if !updated.admins().contains(address) {
            return Ok(());
        }
        if updated.admins().len() == 1 {
            return Err(AgoraError::CannotRemoveLastAdmin(*address));
        }
        updated.admins_mut().remove(address);
        tracing::info!(module = %self.namespace, admin = %address, by = %requester, "admin removed");
        self.set(updated);
        Ok(())
    }
}
