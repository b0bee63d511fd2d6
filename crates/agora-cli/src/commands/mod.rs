// crates/agora-cli/src/commands/mod.rs
//
// Command module declarations for the Agora CLI.

pub mod apply;
pub mod check;
pub mod export;
pub mod init;
pub mod keys;
pub mod query;
