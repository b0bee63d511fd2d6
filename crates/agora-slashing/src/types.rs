// crates/agora-slashing/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::error::AgoraError;
use agora_core::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashType {
    Unhelpful,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashReason {
    Plagiarism,
    NotAddressingClaim,
    FocusedOnPerson,
    PoorlyWritten,
    /// Free-form; requires a detailed reason.
    Other,
}

impl fmt::Display for SlashReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlashReason::Plagiarism => "plagiarism",
            SlashReason::NotAddressingClaim => "not_addressing_claim",
            SlashReason::FocusedOnPerson => "focused_on_person",
            SlashReason::PoorlyWritten => "poorly_written",
            SlashReason::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for SlashReason {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plagiarism" => Ok(SlashReason::Plagiarism),
            "not_addressing_claim" => Ok(SlashReason::NotAddressingClaim),
            "focused_on_person" => Ok(SlashReason::FocusedOnPerson),
            "poorly_written" => Ok(SlashReason::PoorlyWritten),
            "other" => Ok(SlashReason::Other),
            _ => Err(AgoraError::InvalidSlashReason(format!("unknown slash reason {:?}", s))),
        }
    }
}

/// A complaint filed against an argument. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slash {
    pub id: u64,
    pub argument_id: u64,
    pub creator: Address,
    pub slash_type: SlashType,
    pub reason: SlashReason,
    #[serde(default)]
    pub detailed_reason: String,
    pub created_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_parse_and_display() {
        for reason in [
            SlashReason::Plagiarism,
            SlashReason::NotAddressingClaim,
            SlashReason::FocusedOnPerson,
            SlashReason::PoorlyWritten,
            SlashReason::Other,
        ] {
            assert_eq!(reason.to_string().parse::<SlashReason>().unwrap(), reason);
        }
        assert!(matches!(
            "spam".parse::<SlashReason>(),
            Err(AgoraError::InvalidSlashReason(_))
        ));
    }

    #[test]
    fn test_reason_serde_matches_display() {
        let json = serde_json::to_string(&SlashReason::NotAddressingClaim).unwrap();
        assert_eq!(json, "\"not_addressing_claim\"");
    }
}
