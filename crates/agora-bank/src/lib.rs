// crates/agora-bank/src/lib.rs
//
// agora-bank: in-process implementations of the external collaborators the
// engines call but do not own: token custody with named module pools
// (`Bank`) and account jail status (`Accounts`).
//
// All monetary values are tracked in base units of their denomination.

pub mod accounts;
pub mod bank;

pub use accounts::{AccountStatus, Accounts};
pub use bank::{Bank, Party, TransactionRecord, REWARD_POOL, STAKES_POOL};
