// crates/agora-app/src/msgs.rs
//
// Commands accepted by the app. Each carries the address acting on it.

use serde::{Deserialize, Serialize};

use agora_core::{Address, Claim};
use agora_slashing::{SlashOutcome, SlashReason, SlashType};
use agora_staking::{Argument, Stake, Stance, Withdrawal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    CreateClaim {
        community_id: String,
        body: String,
        creator: Address,
        #[serde(default)]
        source: String,
    },
    SubmitArgument {
        claim_id: u64,
        body: String,
        summary: String,
        creator: Address,
        stake_type: Stance,
    },
    SubmitUpvote {
        argument_id: u64,
        creator: Address,
    },
    EditArgument {
        argument_id: u64,
        body: String,
        summary: String,
        editor: Address,
    },
    WithdrawStake {
        stake_id: u64,
        requester: Address,
    },
    AddStakingAdmin {
        admin: Address,
        creator: Address,
    },
    RemoveStakingAdmin {
        admin: Address,
        remover: Address,
    },
    UpdateStakingParams {
        updater: Address,
        updates: agora_staking::ParamsUpdate,
    },
    CreateSlash {
        argument_id: u64,
        slash_type: SlashType,
        reason: SlashReason,
        #[serde(default)]
        detailed_reason: String,
        creator: Address,
    },
    AddSlashingAdmin {
        admin: Address,
        creator: Address,
    },
    RemoveSlashingAdmin {
        admin: Address,
        remover: Address,
    },
    UpdateSlashingParams {
        updater: Address,
        updates: agora_slashing::ParamsUpdate,
    },
}

impl Msg {
    /// The address on whose authority the command runs.
    pub fn signer(&self) -> Address {
        match self {
            Msg::CreateClaim { creator, .. }
            | Msg::SubmitArgument { creator, .. }
            | Msg::SubmitUpvote { creator, .. }
            | Msg::AddStakingAdmin { creator, .. }
            | Msg::CreateSlash { creator, .. }
            | Msg::AddSlashingAdmin { creator, .. } => *creator,
            Msg::EditArgument { editor, .. } => *editor,
            Msg::WithdrawStake { requester, .. } => *requester,
            Msg::RemoveStakingAdmin { remover, .. } | Msg::RemoveSlashingAdmin { remover, .. } => *remover,
            Msg::UpdateStakingParams { updater, .. } | Msg::UpdateSlashingParams { updater, .. } => *updater,
        }
    }

    /// Engine that handles the command.
    pub fn route(&self) -> &'static str {
        match self {
            Msg::CreateClaim { .. } => "claim",
            Msg::SubmitArgument { .. }
            | Msg::SubmitUpvote { .. }
            | Msg::EditArgument { .. }
            | Msg::WithdrawStake { .. }
            | Msg::AddStakingAdmin { .. }
            | Msg::RemoveStakingAdmin { .. }
            | Msg::UpdateStakingParams { .. } => agora_staking::MODULE_NAME,
            Msg::CreateSlash { .. }
            | Msg::AddSlashingAdmin { .. }
            | Msg::RemoveSlashingAdmin { .. }
            | Msg::UpdateSlashingParams { .. } => agora_slashing::MODULE_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MsgResponse {
    Claim(Claim),
    Argument(Argument),
    Stake(Stake),
    Withdrawal(Withdrawal),
    Slash(SlashOutcome),
    StakingParams(agora_staking::Params),
    SlashingParams(agora_slashing::Params),
    AdminsUpdated,
}
