// crates/trellis-core/src/edge.rs

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::claim::ClaimId;
use crate::clock::Timestamp;
use crate::identity::Principal;

/// Sequential edge identifier. The first edge is 1.
pub type EdgeId = u64;

/// Opaque hash pointing at off-graph evidence for an edge.
pub type EvidenceRef = [u8; 32];

/// Domain separator for purpose-keys that tie a stake to an edge.
const EDGE_STAKE_DOMAIN: &[u8] = b"trellis:edge-stake:";

/// The relationship an edge asserts between its source and target claims.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    /// The target's truth rests on the source. Only Depends edges attenuate
    /// scores and only Depends edges must stay acyclic.
    Depends,
    /// The source lends support to the target. Informational.
    Supports,
    /// The source contradicts the target. Penalizes the target's chain score.
    Contradicts,
}

/// Lifecycle states of an edge.
///
///   Active --> Disputed --> Invalidated
///     |                        ^
///     +------------------------+
///     |
///     v
///   Removed
///
/// Removed and Invalidated are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EdgeStatus {
    Active,
    /// Challenged; the proposer's stake has been slashed.
    Disputed,
    /// Struck down by a privileged invalidator.
    Invalidated,
    /// Withdrawn by its proposer with a full stake refund.
    Removed,
}

impl EdgeStatus {
    /// Whether the state machine permits `self -> next`.
    pub fn can_transition_to(self, next: EdgeStatus) -> bool {
        matches!(
            (self, next),
            (EdgeStatus::Active, EdgeStatus::Disputed)
                | (EdgeStatus::Active, EdgeStatus::Removed)
                | (EdgeStatus::Active, EdgeStatus::Invalidated)
                | (EdgeStatus::Disputed, EdgeStatus::Invalidated)
        )
    }

    /// Active and Disputed edges hold their (source, target, type) slot.
    pub fn occupies_slot(self) -> bool {
        matches!(self, EdgeStatus::Active | EdgeStatus::Disputed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EdgeStatus::Invalidated | EdgeStatus::Removed)
    }
}

/// A staked, typed relationship from a dependency (`source`) to a dependent
/// (`target`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    /// The dependency.
    pub source: ClaimId,
    /// The dependent.
    pub target: ClaimId,
    pub edge_type: EdgeType,
    pub status: EdgeStatus,
    pub proposer: Principal,
    pub evidence: EvidenceRef,
    /// Stake currently backing the edge, in base units. Set at creation,
    /// reduced by a dispute, zero once refunded.
    pub stake: u64,
    /// Proposer's confidence in [0, 10_000].
    pub confidence: u16,
    pub created_at: Timestamp,
    /// Set once the proposer has collected the maturity reward.
    #[serde(default)]
    pub reward_claimed: bool,
}

impl Edge {
    /// The deduplication slot this edge occupies while Active or Disputed.
    pub fn slot(&self) -> (ClaimId, ClaimId, EdgeType) {
        (self.source, self.target, self.edge_type)
    }

    pub fn is_active(&self) -> bool {
        self.status == EdgeStatus::Active
    }

    pub fn stake_key(&self) -> StakeKey {
        StakeKey::for_edge(self.id)
    }
}

/// Purpose-key tying a stake record to one edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StakeKey(pub [u8; 32]);

impl StakeKey {
    /// SHA-256("trellis:edge-stake:" || edge_id as big-endian bytes).
    pub fn for_edge(id: EdgeId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(EDGE_STAKE_DOMAIN);
        hasher.update(id.to_be_bytes());
        Self(hasher.finalize().into())
    }
}

impl StakeKey {
    /// Full lowercase hex of the key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for StakeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}
