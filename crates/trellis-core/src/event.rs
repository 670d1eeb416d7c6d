// crates/trellis-core/src/event.rs
//
// Domain events emitted for the external indexer. The engine appends them to
// an output log after a call commits; nothing in the engine reads them back.

use serde::{Deserialize, Serialize};

use crate::claim::ClaimId;
use crate::clock::Timestamp;
use crate::edge::{EdgeId, EdgeType, StakeKey};
use crate::identity::Principal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GraphEvent {
    EdgeCreated {
        edge_id: EdgeId,
        source: ClaimId,
        target: ClaimId,
        edge_type: EdgeType,
        proposer: Principal,
        stake: u64,
        confidence: u16,
    },
    EdgeDisputed {
        edge_id: EdgeId,
        challenger: Principal,
        slashed: u64,
        challenger_payout: u64,
    },
    EdgeInvalidated {
        edge_id: EdgeId,
        by: Principal,
    },
    EdgeRemoved {
        edge_id: EdgeId,
        refunded: u64,
    },
    ScorePropagated {
        claim_id: ClaimId,
        chain_score: u64,
        weakest_link_edge: Option<EdgeId>,
        depth: u32,
    },
    WeakLinkFlagged {
        edge_id: EdgeId,
        flagger: Principal,
    },
    WeakLinkRewarded {
        edge_id: EdgeId,
        flagger: Principal,
        bounty: u64,
    },
    EdgeRewardClaimed {
        edge_id: EdgeId,
        proposer: Principal,
        reward: u64,
    },
    Staked {
        owner: Principal,
        key: StakeKey,
        amount: u64,
    },
    Unstaked {
        owner: Principal,
        key: StakeKey,
        amount: u64,
    },
    ConfigUpdated {
        field: String,
        by: Principal,
    },
}

impl GraphEvent {
    /// Short event name, as an indexer would key it.
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::EdgeCreated { .. } => "EdgeCreated",
            GraphEvent::EdgeDisputed { .. } => "EdgeDisputed",
            GraphEvent::EdgeInvalidated { .. } => "EdgeInvalidated",
            GraphEvent::EdgeRemoved { .. } => "EdgeRemoved",
            GraphEvent::ScorePropagated { .. } => "ScorePropagated",
            GraphEvent::WeakLinkFlagged { .. } => "WeakLinkFlagged",
            GraphEvent::WeakLinkRewarded { .. } => "WeakLinkRewarded",
            GraphEvent::EdgeRewardClaimed { .. } => "EdgeRewardClaimed",
            GraphEvent::Staked { .. } => "Staked",
            GraphEvent::Unstaked { .. } => "Unstaked",
            GraphEvent::ConfigUpdated { .. } => "ConfigUpdated",
        }
    }
}

/// An event with its position in the append-only log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequencedEvent {
    /// Monotonic sequence number, starting at 0.
    pub seq: u64,
    pub at: Timestamp,
    pub event: GraphEvent,
}
