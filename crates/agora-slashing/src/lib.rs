// crates/agora-slashing/src/lib.rs
//
// Slashing engine.
//
// Participants file slashes against arguments they find unhelpful. Admins, or
// users who have earned enough interest, are eligible. Once enough slashes of
// a type accumulate on an argument (or an admin files one), the argument is
// flagged unhelpful and its creator is punished: their stake on the argument
// is burned along with a multiple of it from their balance, the slasher is
// rewarded from the reward pool, and repeat offenders are jailed.

pub mod genesis;
pub mod keeper;
pub mod params;
pub mod punishment;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use genesis::GenesisState;
pub use keeper::{SlashOutcome, SlashingKeeper};
pub use params::{Params, ParamsUpdate, MODULE_NAME};
pub use punishment::Punishment;
pub use types::{Slash, SlashReason, SlashType};
