// crates/agora-core/src/lib.rs
//
// agora-core: Core types, collaborator traits, and the parameter store for
// the Agora argument economy.
//
// This is the leaf crate that every other crate in the workspace depends on.
// It defines addresses, coins, the fixed-point decimal used for all interest
// and share computations, the Claim record, the block context handed to the
// engines, the collaborator interfaces (token custody, account/jail status,
// claim registry), and the versioned, admin-gated parameter subspace.

pub mod address;
pub mod claim;
pub mod coin;
pub mod context;
pub mod decimal;
pub mod error;
pub mod params;
pub mod pool;
pub mod traits;
pub mod transaction;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use agora_core::Coin;`

pub use address::Address;
pub use claim::Claim;
pub use coin::{Coin, Coins, STAKE_DENOM, UNITS_PER_TOKEN};
pub use context::{BlockInfo, Context};
pub use decimal::Dec;
pub use error::{AgoraError, ErrorKind};
pub use params::{AdminGoverned, AdminSet, ParamSubspace};
pub use pool::{REWARD_POOL, STAKES_POOL};
pub use traits::{AccountKeeper, BankKeeper, ClaimKeeper};
pub use transaction::TransactionKind;
