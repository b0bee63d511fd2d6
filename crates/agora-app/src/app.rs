// crates/agora-app/src/app.rs
//
// The composed application.
//
// `deliver` runs each command against a working copy of the whole state and
// swaps it in only when the command succeeds. A failing command therefore has
// no observable effect on balances, pools, entities, or the transaction log.
// The append-only transaction log is detached before the copy and reattached
// afterwards, so a command never pays for copying the chain's history.
// Commands are delivered one at a time; `App` holds no interior mutability.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use agora_bank::{Accounts, Bank, REWARD_POOL, STAKES_POOL};
use agora_claim::ClaimRegistry;
use agora_core::error::AgoraError;
use agora_core::traits::{AccountKeeper, BankKeeper, ClaimKeeper};
use agora_core::{Address, BlockInfo, Coin, Context, STAKE_DENOM};
use agora_slashing::SlashingKeeper;
use agora_staking::StakingKeeper;

use crate::genesis::AppGenesis;
use crate::msgs::{Msg, MsgResponse};
use crate::query::Query;

#[derive(Debug, Clone)]
pub struct App {
    genesis_time: DateTime<Utc>,
    bank: Bank,
    accounts: Accounts,
    claims: ClaimRegistry,
    staking: StakingKeeper,
    slashing: SlashingKeeper,
}

impl App {
    /// A fresh chain with both pools registered and empty.
    pub fn new(
        genesis_time: DateTime<Utc>,
        staking_params: agora_staking::Params,
        slashing_params: agora_slashing::Params,
    ) -> Result<Self, AgoraError> {
        staking_params.validate()?;
        slashing_params.validate()?;
        Ok(Self {
            genesis_time,
            bank: Bank::with_default_pools(),
            accounts: Accounts::new(),
            claims: ClaimRegistry::new(),
            staking: StakingKeeper::new(staking_params),
            slashing: SlashingKeeper::new(slashing_params),
        })
    }

    /// Rebuild from a genesis document after validating it.
    pub fn from_genesis(genesis: &AppGenesis) -> Result<Self, AgoraError> {
        genesis.validate()?;
        let mut bank = Bank::import_genesis(&genesis.bank)?;
        bank.register_module(STAKES_POOL);
        bank.register_module(REWARD_POOL);
        let app = Self {
            genesis_time: genesis.genesis_time,
            bank,
            accounts: Accounts::import_genesis(&genesis.accounts),
            claims: ClaimRegistry::import_genesis(&genesis.claim)?,
            staking: StakingKeeper::import_genesis(&genesis.staking)?,
            slashing: SlashingKeeper::import_genesis(&genesis.slashing)?,
        };
        tracing::info!(
            claims = genesis.claim.claims.len(),
            arguments = genesis.staking.arguments.len(),
            slashes = genesis.slashing.slashes.len(),
            "app state loaded from genesis"
        );
        Ok(app)
    }

    pub fn export_genesis(&self) -> AppGenesis {
        AppGenesis {
            genesis_time: self.genesis_time,
            bank: self.bank.export_genesis(),
            accounts: self.accounts.export_genesis(),
            claim: self.claims.export_genesis(),
            staking: self.staking.export_genesis(),
            slashing: self.slashing.export_genesis(),
        }
    }

    /// Mint new coins into a module pool.
    pub fn mint_to_pool(&mut self, pool: &str, amount: &Coin) -> Result<(), AgoraError> {
        self.bank.mint_coins(pool, amount)
    }

    /// Credit an account at chain setup.
    pub fn fund_account(&mut self, address: &Address, amount: &Coin) -> Result<(), AgoraError> {
        self.bank.fund_account(address, amount)
    }

    /// Release accounts whose jail time has passed. Hosts call this at the
    /// start of each block.
    pub fn begin_block(&mut self, block: &BlockInfo) -> Vec<Address> {
        self.accounts.release_expired(block.time)
    }

    /// Execute one command atomically.
    pub fn deliver(&mut self, block: BlockInfo, msg: &Msg) -> Result<MsgResponse, AgoraError> {
        let history = self.bank.take_log();
        let mut working = self.clone();
        match working.execute(block, msg) {
            Ok(response) => {
                working.bank.prepend_log(history);
                *self = working;
                Ok(response)
            }
            Err(err) => {
                self.bank.prepend_log(history);
                tracing::warn!(
                    height = block.height,
                    route = msg.route(),
                    signer = %msg.signer(),
                    kind = ?err.kind(),
                    "command rejected: {}",
                    err
                );
                Err(err)
            }
        }
    }

    fn execute(&mut self, block: BlockInfo, msg: &Msg) -> Result<MsgResponse, AgoraError> {
        let App {
            bank,
            accounts,
            claims,
            staking,
            slashing,
            ..
        } = self;

        let response = match msg {
            Msg::CreateClaim {
                community_id,
                body,
                creator,
                source,
            } => {
                if accounts.is_jailed(creator)? {
                    return Err(AgoraError::AccountJailed(*creator));
                }
                MsgResponse::Claim(claims.create_claim(community_id, body, *creator, source, block.time))
            }
            Msg::SubmitArgument {
                claim_id,
                body,
                summary,
                creator,
                stake_type,
            } => {
                let mut ctx = context(block, bank, accounts, claims);
                MsgResponse::Argument(staking.submit_argument(
                    &mut ctx,
                    body,
                    summary,
                    *creator,
                    *claim_id,
                    *stake_type,
                )?)
            }
            Msg::SubmitUpvote { argument_id, creator } => {
                let mut ctx = context(block, bank, accounts, claims);
                MsgResponse::Stake(staking.submit_upvote(&mut ctx, *argument_id, *creator)?)
            }
            Msg::EditArgument {
                argument_id,
                body,
                summary,
                editor,
            } => {
                let mut ctx = context(block, bank, accounts, claims);
                MsgResponse::Argument(staking.edit_argument(&mut ctx, *argument_id, body, summary, *editor)?)
            }
            Msg::WithdrawStake { stake_id, requester } => {
                let mut ctx = context(block, bank, accounts, claims);
                MsgResponse::Withdrawal(staking.withdraw_stake(&mut ctx, *stake_id, *requester)?)
            }
            Msg::AddStakingAdmin { admin, creator } => {
                staking.add_admin(*admin, creator)?;
                MsgResponse::AdminsUpdated
            }
            Msg::RemoveStakingAdmin { admin, remover } => {
                staking.remove_admin(admin, remover)?;
                MsgResponse::AdminsUpdated
            }
            Msg::UpdateStakingParams { updater, updates } => {
                MsgResponse::StakingParams(staking.update_params(updater, updates)?)
            }
            Msg::CreateSlash {
                argument_id,
                slash_type,
                reason,
                detailed_reason,
                creator,
            } => {
                let mut ctx = context(block, bank, accounts, claims);
                MsgResponse::Slash(slashing.create_slash(
                    &mut ctx,
                    staking,
                    *argument_id,
                    *slash_type,
                    *reason,
                    detailed_reason,
                    *creator,
                )?)
            }
            Msg::AddSlashingAdmin { admin, creator } => {
                slashing.add_admin(*admin, creator)?;
                MsgResponse::AdminsUpdated
            }
            Msg::RemoveSlashingAdmin { admin, remover } => {
                slashing.remove_admin(admin, remover)?;
                MsgResponse::AdminsUpdated
            }
            Msg::UpdateSlashingParams { updater, updates } => {
                MsgResponse::SlashingParams(slashing.update_params(updater, updates)?)
            }
        };
        tracing::debug!(height = block.height, route = msg.route(), "command applied");
        Ok(response)
    }

    /// Answer a read-only query.
    pub fn query(&self, query: &Query) -> Result<Value, AgoraError> {
        let staking = &self.staking;
        let slashing = &self.slashing;
        match query {
            Query::Claim { id } => to_value(self.claims.claim(*id).ok_or(AgoraError::ClaimNotFound(*id))?),
            Query::Claims => to_value(self.claims.claims()),
            Query::CommunityClaims { community_id } => to_value(self.claims.community_claims(community_id)),
            Query::Argument { id } => to_value(staking.argument(*id)?),
            Query::Arguments { ids } => to_value(staking.arguments_by_ids(ids)?),
            Query::ClaimArguments { claim_id } => to_value(staking.claim_arguments(*claim_id)),
            Query::TopArgument { claim_id } => to_value(staking.top_argument(*claim_id)),
            Query::Stake { id } => to_value(staking.stake(*id)?),
            Query::ArgumentStakes { argument_id } => to_value(staking.argument_stakes(*argument_id)),
            Query::CommunityStakes { community_id } => to_value(staking.community_stakes(community_id)),
            Query::UserStakes { address } => to_value(staking.user_stakes(address)),
            Query::UserCommunityStakes { address, community_id } => {
                to_value(staking.user_community_stakes(address, community_id))
            }
            Query::UserStakesAfter { address, after } => to_value(staking.user_stakes_after(address, *after)),
            Query::UserCommunityStakeTotal { address, community_id } => {
                to_value(staking.user_community_stake_total(address, community_id)?)
            }
            Query::UserArgumentStakeTotal { address, argument_id } => {
                to_value(staking.user_argument_stake_total(address, *argument_id)?)
            }
            Query::EarnedCoins { address } => to_value(staking.earned_coins(address)),
            Query::TotalEarnedCoins { address } => to_value(staking.total_earned_coins(address)?),
            Query::StakingParams => to_value(staking.params()),
            Query::Slash { id } => to_value(slashing.slash(*id)?),
            Query::Slashes => to_value(slashing.slashes()),
            Query::ArgumentSlashes { argument_id } => to_value(slashing.argument_slashes(*argument_id)),
            Query::SlashingParams => to_value(slashing.params()),
            Query::Balances { address } => to_value(self.bank.balances(address)),
            Query::Account { address } => to_value(self.accounts.status(address)),
            Query::Transactions { address } => to_value(self.bank.transactions_for(address)),
            Query::Supply => to_value(serde_json::json!({
                "supply": self.bank.total_supply(),
                "minted": self.bank.minted(),
                "burned": self.bank.burned(),
                "stakes_pool": self.bank.module_balance(STAKES_POOL, STAKE_DENOM)?,
                "reward_pool": self.bank.module_balance(REWARD_POOL, STAKE_DENOM)?,
            })),
        }
    }

    /// Check every cross-module invariant on the live state.
    pub fn check_invariants(&self) -> Result<(), AgoraError> {
        let held = self.bank.total_held(STAKE_DENOM);
        let supply = self.bank.total_supply().amount_of(STAKE_DENOM);
        if held != supply {
            return Err(AgoraError::InvariantViolation(format!(
                "held {} does not match supply {}",
                held, supply
            )));
        }
        self.export_genesis().validate()
    }

    pub fn genesis_time(&self) -> DateTime<Utc> {
        self.genesis_time
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn claims(&self) -> &ClaimRegistry {
        &self.claims
    }

    pub fn staking(&self) -> &StakingKeeper {
        &self.staking
    }

    pub fn slashing(&self) -> &SlashingKeeper {
        &self.slashing
    }

    /// Balance of one account in the native denomination.
    pub fn balance(&self, address: &Address) -> Coin {
        self.bank.balance(address, STAKE_DENOM)
    }
}

fn context<'a>(
    block: BlockInfo,
    bank: &'a mut Bank,
    accounts: &'a mut Accounts,
    claims: &'a mut ClaimRegistry,
) -> Context<'a> {
    Context::new(block, bank, accounts, claims)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, AgoraError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Utc::now(), Default::default(), Default::default()).unwrap()
    }

    #[test]
    fn test_new_app_has_empty_pools() {
        let app = app();
        let supply = app.query(&Query::Supply).unwrap();
        assert_eq!(supply["stakes_pool"]["amount"], 0);
        app.check_invariants().unwrap();
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = agora_staking::Params {
            period_secs: 0,
            ..Default::default()
        };
        assert!(App::new(Utc::now(), params, Default::default()).is_err());
    }

    #[test]
    fn test_create_claim_through_deliver() {
        let mut app = app();
        let creator = Address::random();
        let block = BlockInfo::new(1, Utc::now());
        let msg = Msg::CreateClaim {
            community_id: "crypto".to_string(),
            body: "Bitcoin is digital gold".to_string(),
            creator,
            source: String::new(),
        };
        match app.deliver(block, &msg).unwrap() {
            MsgResponse::Claim(claim) => assert_eq!(claim.id, 1),
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(app.query(&Query::Claims).unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_deliver_keeps_history_across_commands() {
        let mut app = app();
        let creator = Address::random();
        app.fund_account(&creator, &Coin::tokens(100)).unwrap();
        app.mint_to_pool(STAKES_POOL, &Coin::tokens(10)).unwrap();
        assert_eq!(app.bank().transactions().len(), 1);

        let block = BlockInfo::new(1, Utc::now());
        let claim = Msg::CreateClaim {
            community_id: "crypto".to_string(),
            body: "Bitcoin is digital gold".to_string(),
            creator,
            source: String::new(),
        };
        app.deliver(block, &claim).unwrap();
        let argument = Msg::SubmitArgument {
            claim_id: 1,
            body: "A fixed supply makes it a store of value".to_string(),
            summary: "Fixed supply keeps it scarce over time".to_string(),
            creator,
            stake_type: agora_staking::Stance::Backing,
        };
        app.deliver(block, &argument).unwrap();
        let after_success = app.bank().transactions().to_vec();
        assert_eq!(after_success.len(), 2);
        assert_eq!(after_success[0].kind, agora_core::transaction::TransactionKind::Mint);

        let missing = Msg::SubmitArgument {
            claim_id: 99,
            body: "This argument points at a missing claim".to_string(),
            summary: "Nothing to argue about on this claim".to_string(),
            creator,
            stake_type: agora_staking::Stance::Backing,
        };
        assert!(app.deliver(block, &missing).is_err());
        assert_eq!(app.bank().transactions(), after_success.as_slice());
    }

    #[test]
    fn test_reload_keeps_minted_and_transactions() {
        let mut app = app();
        let creator = Address::random();
        app.fund_account(&creator, &Coin::tokens(100)).unwrap();
        app.mint_to_pool(REWARD_POOL, &Coin::tokens(25)).unwrap();
        let block = BlockInfo::new(1, Utc::now());
        app.deliver(
            block,
            &Msg::CreateClaim {
                community_id: "crypto".to_string(),
                body: "Bitcoin is digital gold".to_string(),
                creator,
                source: String::new(),
            },
        )
        .unwrap();
        app.deliver(
            block,
            &Msg::SubmitArgument {
                claim_id: 1,
                body: "A fixed supply makes it a store of value".to_string(),
                summary: "Fixed supply keeps it scarce over time".to_string(),
                creator,
                stake_type: agora_staking::Stance::Backing,
            },
        )
        .unwrap();

        let restored = App::from_genesis(&app.export_genesis()).unwrap();
        let history = Query::Transactions { address: creator };
        assert_eq!(restored.query(&history).unwrap(), app.query(&history).unwrap());
        assert_eq!(restored.query(&history).unwrap().as_array().unwrap().len(), 1);
        let supply = restored.query(&Query::Supply).unwrap();
        assert_eq!(supply, app.query(&Query::Supply).unwrap());
        assert_eq!(restored.bank().minted().amount_of(STAKE_DENOM), Coin::tokens(25).amount);
        restored.check_invariants().unwrap();
    }

    #[test]
    fn test_unknown_entities_are_not_found() {
        let app = app();
        let err = app.query(&Query::Argument { id: 3 }).unwrap_err();
        assert_eq!(err.kind(), agora_core::ErrorKind::NotFound);
        let err = app.query(&Query::Claim { id: 3 }).unwrap_err();
        assert_eq!(err, AgoraError::ClaimNotFound(3));
    }
}
