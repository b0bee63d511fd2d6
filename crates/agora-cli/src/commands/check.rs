// crates/agora-cli/src/commands/check.rs
//
// `agora check`: verify every cross-module invariant on the local state.

use agora_core::STAKE_DENOM;

use crate::config::CliConfig;
use crate::state::LocalState;

pub fn run(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = LocalState::load(&config.state_path())?;
    let app = state.to_app()?;
    app.check_invariants()?;

    let bank = app.bank();
    println!("State at height {} is consistent.", state.height);
    println!("  Supply:    {}", bank.total_supply().amount_of(STAKE_DENOM));
    println!("  Burned:    {}", bank.burned().amount_of(STAKE_DENOM));
    println!("  Claims:    {}", app.claims().claims().len());
    println!("  Arguments: {}", app.staking().arguments().len());
    println!("  Slashes:   {}", app.slashing().slashes().len());
    Ok(())
}
