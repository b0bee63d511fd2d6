// crates/agora-core/src/address.rs
//
// Account addresses.
//
// An address is the first 20 bytes of SHA-256 over an ed25519 public key.
// It is displayed and serialized as lowercase hex.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::AgoraError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the address controlled by an ed25519 public key.
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
        Self(bytes)
    }

    /// Generate a fresh keypair and return it with its address.
    pub fn generate() -> (SigningKey, Address) {
        let signing_key = SigningKey::generate(&mut OsRng);
        let address = Self::from_public_key(&signing_key.verifying_key());
        (signing_key, address)
    }

    /// A fresh address with no retained key. Used by tests and genesis tooling.
    pub fn random() -> Self {
        Self::generate().1
    }

    /// Parse a hex-encoded address.
    pub fn from_hex(s: &str) -> Result<Self, AgoraError> {
        let raw = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| AgoraError::Serialization(format!("invalid address {}: {}", s, e)))?;
        let bytes: [u8; ADDRESS_LEN] = raw.try_into().map_err(|v: Vec<u8>| {
            AgoraError::Serialization(format!(
                "invalid address {}: expected {} bytes, got {}",
                s,
                ADDRESS_LEN,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let addr = Address::new([0xab; ADDRESS_LEN]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
        assert_eq!(addr.to_string().len(), ADDRESS_LEN * 2);
    }

    #[test]
    fn test_from_public_key_is_deterministic() {
        let (key, addr) = Address::generate();
        assert_eq!(Address::from_public_key(&key.verifying_key()), addr);
    }

    #[test]
    fn test_random_addresses_differ() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(Address::from_hex("abcd").is_err());
        assert!(Address::from_hex("zz").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr = Address::new([1u8; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(ADDRESS_LEN)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
