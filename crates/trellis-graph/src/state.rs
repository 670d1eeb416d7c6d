// crates/trellis-graph/src/state.rs
//
// The single owned state aggregate. Every structure an operation can touch
// lives here. Mutations record the prior value of each entity they touch in
// the journal, which is what a failed call rolls back and what a committed
// call persists.

use std::collections::{BTreeMap, HashMap};

use trellis_core::{
    ClaimId, Edge, EdgeId, EdgeType, Principal, PropagatedScore, StakeKey, WeakLinkFlag,
};
use trellis_economics::{StakeRecord, StakeVault};

use crate::access::AccessControl;
use crate::config::EngineConfig;
use crate::journal::Journal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub(crate) config: EngineConfig,
    pub(crate) access: AccessControl,

    /// All edges ever created, in any status.
    pub(crate) edges: BTreeMap<EdgeId, Edge>,

    /// By-dependent index: target claim -> edges it depends on (all types).
    pub(crate) depends_on: HashMap<ClaimId, Vec<EdgeId>>,

    /// By-dependency index: source claim -> edges that depend on it (all types).
    pub(crate) depended_on_by: HashMap<ClaimId, Vec<EdgeId>>,

    /// Dedup slots held by Active or Disputed edges.
    pub(crate) slots: HashMap<(ClaimId, ClaimId, EdgeType), EdgeId>,

    /// Stake key -> the edge it backs.
    pub(crate) backing: HashMap<StakeKey, EdgeId>,

    pub(crate) scores: HashMap<ClaimId, PropagatedScore>,

    pub(crate) flags: BTreeMap<EdgeId, Vec<WeakLinkFlag>>,

    pub(crate) vault: StakeVault,

    pub(crate) next_edge_id: EdgeId,

    /// Sequence number the next published event will carry.
    pub(crate) next_event_seq: u64,

    /// Prior values of entities touched by the call in progress.
    pub(crate) journal: Journal,
}

impl EngineState {
    pub fn new(config: EngineConfig, admin: Principal) -> Self {
        Self::with_access(config, AccessControl::with_admin(admin))
    }

    pub(crate) fn with_access(config: EngineConfig, access: AccessControl) -> Self {
        Self {
            config,
            access,
            edges: BTreeMap::new(),
            depends_on: HashMap::new(),
            depended_on_by: HashMap::new(),
            slots: HashMap::new(),
            backing: HashMap::new(),
            scores: HashMap::new(),
            flags: BTreeMap::new(),
            vault: StakeVault::new(),
            next_edge_id: 1,
            next_event_seq: 0,
            journal: Journal::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// The id the next created edge will receive. Stake for that edge must
    /// be deposited under `StakeKey::for_edge(next_edge_id())`.
    pub fn next_edge_id(&self) -> EdgeId {
        self.next_edge_id
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges (any type, any status) whose target is `claim`.
    pub fn edges_depending_on(&self, claim: &ClaimId) -> Vec<&Edge> {
        self.resolve(self.depends_on.get(claim))
    }

    /// Edges (any type, any status) whose source is `claim`.
    pub fn edges_depended_on_by(&self, claim: &ClaimId) -> Vec<&Edge> {
        self.resolve(self.depended_on_by.get(claim))
    }

    pub fn propagated_score(&self, claim: &ClaimId) -> Option<&PropagatedScore> {
        self.scores.get(claim)
    }

    pub fn flags(&self, edge: EdgeId) -> &[WeakLinkFlag] {
        self.flags.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stake_of(&self, owner: &Principal, key: &StakeKey) -> Option<&StakeRecord> {
        self.vault.get(owner, key)
    }

    pub fn vault(&self) -> &StakeVault {
        &self.vault
    }

    fn resolve(&self, ids: Option<&Vec<EdgeId>>) -> Vec<&Edge> {
        ids.map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }
}
