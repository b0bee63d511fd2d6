// crates/agora-claim/src/lib.rs
//
// agora-claim: the claim registry. Pure bookkeeping of claims and their
// aggregate backed/challenged totals, mutated by the staking engine through
// the `ClaimKeeper` interface.

pub mod registry;

pub use registry::{ClaimRegistry, GenesisState};
