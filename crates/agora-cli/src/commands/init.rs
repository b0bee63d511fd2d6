// crates/agora-cli/src/commands/init.rs
//
// `agora init`: create the local state file from a genesis document or from
// flags: admins for both engines, minted pools, and funded accounts.

use std::fs;

use chrono::Utc;
use clap::Args;

use agora_app::{App, AppGenesis};
use agora_core::{Address, Coin, REWARD_POOL, STAKES_POOL};

use crate::config::{expand_tilde, CliConfig};
use crate::state::LocalState;

#[derive(Debug, Args)]
pub struct InitCmd {
    /// Genesis document to start from. Overrides `genesis_file` in the config.
    #[arg(long)]
    pub genesis: Option<String>,

    /// Admin address for both the staking and slashing engines. Repeatable.
    #[arg(long = "admin")]
    pub admins: Vec<String>,

    /// Whole tokens minted into the stakes pool.
    #[arg(long, default_value = "0")]
    pub stakes_pool: u64,

    /// Whole tokens minted into the reward pool.
    #[arg(long, default_value = "0")]
    pub reward_pool: u64,

    /// Fund an account: `<address>=<tokens>`. Repeatable.
    #[arg(long = "fund")]
    pub funds: Vec<String>,

    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(cmd: &InitCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state_path = config.state_path();
    if state_path.exists() && !cmd.force {
        return Err(format!(
            "state file {} already exists. Pass --force to overwrite it.",
            state_path.display()
        )
        .into());
    }

    let mut genesis = match cmd.genesis.as_ref().or(config.genesis_file.as_ref()) {
        Some(path) => {
            tracing::info!("Loading genesis from {}", path);
            AppGenesis::from_json(&fs::read_to_string(expand_tilde(path))?)?
        }
        None => AppGenesis::new(Utc::now()),
    };
    for admin in &cmd.admins {
        let address = Address::from_hex(admin)?;
        genesis.staking.params.staking_admins.insert(address);
        genesis.slashing.params.slash_admins.insert(address);
    }

    let mut app = App::from_genesis(&genesis)?;
    if cmd.stakes_pool > 0 {
        app.mint_to_pool(STAKES_POOL, &pool_amount("--stakes-pool", cmd.stakes_pool)?)?;
    }
    if cmd.reward_pool > 0 {
        app.mint_to_pool(REWARD_POOL, &pool_amount("--reward-pool", cmd.reward_pool)?)?;
    }
    for fund in &cmd.funds {
        let (address, amount) = parse_fund(fund)?;
        app.fund_account(&address, &amount)?;
    }
    app.check_invariants()?;

    let state = LocalState::from_app(&app, 0, genesis.genesis_time);
    state.save(&state_path)?;

    println!("Initialized Agora state.");
    println!("  State file:     {}", state_path.display());
    println!("  Genesis time:   {}", genesis.genesis_time.to_rfc3339());
    println!("  Staking admins: {}", app.staking().admins().len());
    println!("  Slashing admins: {}", app.slashing().admins().len());
    println!("  Claims:         {}", app.claims().claims().len());
    if app.staking().admins().is_empty() {
        println!();
        println!("No admins configured. Parameters cannot be changed without --admin.");
    }
    Ok(())
}

fn pool_amount(flag: &str, tokens: u64) -> Result<Coin, Box<dyn std::error::Error>> {
    Coin::checked_tokens(tokens).map_err(|e| format!("{}: {}", flag, e).into())
}

/// Parse `<address>=<tokens>`.
fn parse_fund(s: &str) -> Result<(Address, Coin), Box<dyn std::error::Error>> {
    let (address, tokens) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <address>=<tokens>, got {}", s))?;
    let tokens: u64 = tokens.trim().parse()?;
    let amount = Coin::checked_tokens(tokens).map_err(|e| format!("--fund {}: {}", s, e))?;
    Ok((Address::from_hex(address.trim())?, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fund() {
        let (address, amount) = parse_fund("0x0707070707070707070707070707070707070707=250").unwrap();
        assert_eq!(address, Address::new([7u8; 20]));
        assert_eq!(amount, Coin::tokens(250));
    }

    #[test]
    fn test_token_counts_that_overflow_are_rejected() {
        let fund = format!("0707070707070707070707070707070707070707={}", u64::MAX);
        let err = parse_fund(&fund).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let err = pool_amount("--stakes-pool", u64::MAX).unwrap_err();
        assert!(err.to_string().starts_with("--stakes-pool"));
        assert_eq!(pool_amount("--reward-pool", 10).unwrap(), Coin::tokens(10));
    }

    #[test]
    fn test_parse_fund_rejects_malformed() {
        assert!(parse_fund("0707070707070707070707070707070707070707").is_err());
        assert!(parse_fund("0707=10").is_err());
        assert!(parse_fund("0707070707070707070707070707070707070707=ten").is_err());
    }
}
