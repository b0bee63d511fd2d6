// crates/agora-app/src/query.rs
//
// Read-only queries. Results are returned as JSON values so hosts can render
// them without knowing every response type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    Claim { id: u64 },
    Claims,
    CommunityClaims { community_id: String },
    Argument { id: u64 },
    Arguments { ids: Vec<u64> },
    ClaimArguments { claim_id: u64 },
    TopArgument { claim_id: u64 },
    Stake { id: u64 },
    ArgumentStakes { argument_id: u64 },
    CommunityStakes { community_id: String },
    UserStakes { address: Address },
    UserCommunityStakes { address: Address, community_id: String },
    UserStakesAfter { address: Address, after: DateTime<Utc> },
    UserCommunityStakeTotal { address: Address, community_id: String },
    UserArgumentStakeTotal { address: Address, argument_id: u64 },
    EarnedCoins { address: Address },
    TotalEarnedCoins { address: Address },
    StakingParams,
    Slash { id: u64 },
    Slashes,
    ArgumentSlashes { argument_id: u64 },
    SlashingParams,
    Balances { address: Address },
    Account { address: Address },
    Transactions { address: Address },
    Supply,
}
