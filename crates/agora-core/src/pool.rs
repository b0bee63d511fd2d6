// crates/agora-core/src/pool.rs

/// Escrow pool for staked principal. Pays back principal and interest on
/// withdrawal; forfeited principal is burned from here.
pub const STAKES_POOL: &str = "user_stakes_pool";

/// Pool that pays slash rewards.
pub const REWARD_POOL: &str = "user_reward_pool";
