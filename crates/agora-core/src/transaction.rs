// crates/agora-core/src/transaction.rs

use serde::{Deserialize, Serialize};

/// Why tokens moved. Every custody call is tagged with one of these plus a
/// reference id (argument, stake, or slash id) so the bank can keep an
/// auditable log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Backing,
    Challenge,
    Upvote,
    BackingReturned,
    ChallengeReturned,
    UpvoteReturned,
    /// Interest paid to an argument creator on their own creation stake.
    InterestArgumentCreation,
    /// Creator's share of interest earned by someone else's upvote.
    InterestUpvoteReceived,
    /// Upvoter's share of interest on their upvote stake.
    InterestUpvoteGiven,
    SlashPenalty,
    SlashReward,
    Mint,
    Burn,
}
