// crates/agora-core/src/claim.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::coin::{Coin, STAKE_DENOM};

/// A statement open for community argumentation.
///
/// `total_backed` and `total_challenged` equal the sum of live stakes of the
/// matching side across every argument under this claim. Only the staking
/// engine moves them, through the `ClaimKeeper` interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub community_id: String,
    pub body: String,
    pub creator: Address,
    /// Source URL, empty when the claim has none.
    #[serde(default)]
    pub source: String,
    pub total_backed: Coin,
    pub total_challenged: Coin,
    pub created_time: DateTime<Utc>,
    /// Set when the first argument is submitted.
    #[serde(default)]
    pub first_argument_time: Option<DateTime<Utc>>,
}

impl Claim {
    pub fn new(
        id: u64,
        community_id: impl Into<String>,
        body: impl Into<String>,
        creator: Address,
        source: impl Into<String>,
        created_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            community_id: community_id.into(),
            body: body.into(),
            creator,
            source: source.into(),
            total_backed: Coin::zero(STAKE_DENOM),
            total_challenged: Coin::zero(STAKE_DENOM),
            created_time,
            first_argument_time: None,
        }
    }
}
