// crates/agora-app/src/lib.rs
//
// agora-app: wires the claim registry, staking engine, and slashing engine to
// the in-memory bank and account store, and delivers commands atomically.
//
// A command either commits all of its effects or none of them.

pub mod app;
pub mod genesis;
pub mod msgs;
pub mod query;

pub use app::App;
pub use genesis::AppGenesis;
pub use msgs::{Msg, MsgResponse};
pub use query::Query;
