// crates/trellis-core/src/score.rs

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::edge::EdgeId;
use crate::identity::Principal;

/// A claim's trust score as of its last explicit propagation.
///
/// Never recomputed implicitly: it reflects the graph at `updated_at`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropagatedScore {
    /// Attenuated, contradiction-penalized score in [0, 10_000].
    pub chain_score: u64,
    /// Effective strength of the weakest Depends edge (0 for axioms).
    pub weakest_link_score: u64,
    pub weakest_link_edge: Option<EdgeId>,
    /// 0 for axioms, otherwise 1 + the deepest dependency.
    pub depth: u32,
    pub updated_at: Timestamp,
}

/// A speculative "this edge looks weak" marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeakLinkFlag {
    pub flagger: Principal,
    pub flagged_at: Timestamp,
    pub resolved: bool,
    pub rewarded: bool,
}

impl WeakLinkFlag {
    pub fn new(flagger: Principal, flagged_at: Timestamp) -> Self {
        Self {
            flagger,
            flagged_at,
            resolved: false,
            rewarded: false,
        }
    }
}
