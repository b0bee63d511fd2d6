// crates/agora-staking/src/lib.rs
//
// Argument staking engine.
//
// Users back or challenge a claim by submitting an argument with a fixed
// creation stake, and upvote arguments with a fixed upvote stake. Every stake
// is escrowed in the stakes pool and accrues compounding interest per whole
// period elapsed. On withdrawal, interest on an upvote is split between the
// upvoter and the argument creator.

pub mod genesis;
pub mod interest;
pub mod keeper;
pub mod params;
pub mod querier;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use genesis::GenesisState;
pub use keeper::StakingKeeper;
pub use params::{Params, ParamsUpdate, MODULE_NAME};
pub use types::{Argument, Stake, StakeType, Stance, UserEarnedCoins, Withdrawal};
