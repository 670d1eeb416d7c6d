// crates/trellis-core/src/error.rs

use thiserror::Error;

use crate::claim::ClaimId;
use crate::edge::{EdgeId, EdgeStatus};

/// Rejection reasons for every Trellis operation.
///
/// All rejections are synchronous and leave no partial state behind.
/// `code()` gives the stable machine-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrellisError {
    /// An edge may not connect a claim to itself.
    #[error("Edge source and target are the same claim {0}")]
    SelfReference(ClaimId),

    #[error("Confidence {0} is outside [0, 10000]")]
    ConfidenceOutOfRange(u64),

    /// The registry reported an intrinsic sub-score above 10000.
    #[error("Sub-score {0} is outside [0, 10000]")]
    SubScoreOutOfRange(u64),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    /// An Active or Disputed edge already occupies the (source, target, type) slot.
    #[error("Duplicate edge: edge {0} already occupies this slot")]
    DuplicateEdge(EdgeId),

    #[error("Inserting this Depends edge would create a cycle")]
    CycleDetected,

    #[error("Insufficient stake: required {required}, staked {staked}")]
    InsufficientStake { required: u64, staked: u64 },

    #[error("Caller is not the proposer of edge {0}")]
    NotProposer(EdgeId),

    #[error("Edge {id} is {status:?}, which does not allow this transition")]
    InvalidStatusForTransition { id: EdgeId, status: EdgeStatus },

    #[error("Caller is not authorized: {0}")]
    NotAuthorized(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("No stake recorded for this owner and key")]
    NoStake,

    #[error("Stake is locked")]
    StakeLocked,

    /// Operator vault calls may not move stake that backs an Active edge.
    #[error("Stake backs active edge {0}")]
    StakeInUse(EdgeId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Basis points {0} outside the allowed range")]
    InvalidBasisPoints(u64),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("The proposer cannot dispute their own edge {0}")]
    SelfDispute(EdgeId),

    #[error("Caller already holds an unresolved flag on edge {0}")]
    AlreadyFlagged(EdgeId),

    #[error("Edge {id} matures at {matures_at}")]
    EdgeNotMature { id: EdgeId, matures_at: u64 },

    #[error("Maturity reward for edge {0} already claimed")]
    RewardAlreadyClaimed(EdgeId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage backend error (RocksDB, in-memory store).
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The token-ledger collaborator rejected a debit or credit.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl TrellisError {
    /// Stable rejection code for callers and indexers.
    pub fn code(&self) -> &'static str {
        match self {
            TrellisError::SelfReference(_) => "SELF_REFERENCE",
            TrellisError::ConfidenceOutOfRange(_) => "CONFIDENCE_OUT_OF_RANGE",
            TrellisError::SubScoreOutOfRange(_) => "SUB_SCORE_OUT_OF_RANGE",
            TrellisError::ClaimNotFound(_) => "CLAIM_NOT_FOUND",
            TrellisError::DuplicateEdge(_) => "DUPLICATE_EDGE",
            TrellisError::CycleDetected => "CYCLE_DETECTED",
            TrellisError::InsufficientStake { .. } => "INSUFFICIENT_STAKE",
            TrellisError::NotProposer(_) => "NOT_PROPOSER",
            TrellisError::InvalidStatusForTransition { .. } => "INVALID_STATUS_FOR_TRANSITION",
            TrellisError::NotAuthorized(_) => "NOT_AUTHORIZED",
            TrellisError::EdgeNotFound(_) => "EDGE_NOT_FOUND",
            TrellisError::NoStake => "NO_STAKE",
            TrellisError::StakeLocked => "STAKE_LOCKED",
            TrellisError::StakeInUse(_) => "STAKE_IN_USE",
            TrellisError::InvalidAmount(_) => "INVALID_AMOUNT",
            TrellisError::InvalidBasisPoints(_) => "INVALID_BASIS_POINTS",
            TrellisError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            TrellisError::SelfDispute(_) => "SELF_DISPUTE",
            TrellisError::AlreadyFlagged(_) => "ALREADY_FLAGGED",
            TrellisError::EdgeNotMature { .. } => "EDGE_NOT_MATURE",
            TrellisError::RewardAlreadyClaimed(_) => "REWARD_ALREADY_CLAIMED",
            TrellisError::InvalidConfig(_) => "INVALID_CONFIG",
            TrellisError::Storage(_) => "STORAGE",
            TrellisError::Serialization(_) => "SERIALIZATION",
            TrellisError::Ledger(_) => "LEDGER",
        }
    }
}

impl From<serde_json::Error> for TrellisError {
    fn from(e: serde_json::Error) -> Self {
        TrellisError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(TrellisError::CycleDetected.code(), "CYCLE_DETECTED");
        assert_eq!(TrellisError::NoStake.code(), "NO_STAKE");
        assert_eq!(
            TrellisError::InsufficientStake { required: 2, staked: 1 }.code(),
            "INSUFFICIENT_STAKE"
        );
    }

    #[test]
    fn test_display_includes_detail() {
        let e = TrellisError::InsufficientBalance { requested: 10, available: 3 };
        assert_eq!(e.to_string(), "Insufficient balance: requested 10, available 3");
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<u64>("nope").unwrap_err();
        assert!(matches!(TrellisError::from(err), TrellisError::Serialization(_)));
    }
}
