// crates/trellis-graph/src/journal.rs
//
// Per-call undo journal. The first time a call touches an entity its prior
// value is recorded. A failed call restores every recorded entity; a
// committed call hands the touched set to the checkpoint writer and clears
// the journal.

use std::collections::BTreeMap;

use trellis_core::{ClaimId, Edge, EdgeId, Principal, PropagatedScore, StakeKey, WeakLinkFlag};
use trellis_economics::StakeRecord;

use crate::access::AccessControl;
use crate::config::EngineConfig;
use crate::state::EngineState;

/// A unit of state that is journaled and persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Entity {
    Config,
    Access,
    Counters,
    Reserve,
    Edge(EdgeId),
    Score(ClaimId),
    Flags(EdgeId),
    Stake(Principal, StakeKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Prior {
    Config(EngineConfig),
    Access(AccessControl),
    Counters { next_edge_id: EdgeId, next_event_seq: u64 },
    Reserve(u64),
    Edge(EdgeId, Option<Edge>),
    Score(ClaimId, Option<PropagatedScore>),
    Flags(EdgeId, Option<Vec<WeakLinkFlag>>),
    Stake(Principal, StakeKey, Option<StakeRecord>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Journal {
    priors: BTreeMap<Entity, Prior>,
}

impl Journal {
    pub(crate) fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// Entities touched since the last commit or rollback, in key order.
    pub(crate) fn touched(&self) -> impl Iterator<Item = Entity> + '_ {
        self.priors.keys().copied()
    }
}

impl EngineState {
    /// Record `entity`'s current value unless this call already did.
    pub(crate) fn touch(&mut self, entity: Entity) {
        if self.journal.priors.contains_key(&entity) {
            return;
        }
        let prior = match entity {
            Entity::Config => Prior::Config(self.config.clone()),
            Entity::Access => Prior::Access(self.access.clone()),
            Entity::Counters => Prior::Counters {
                next_edge_id: self.next_edge_id,
                next_event_seq: self.next_event_seq,
            },
            Entity::Reserve => Prior::Reserve(self.vault.reserve().balance()),
            Entity::Edge(id) => Prior::Edge(id, self.edges.get(&id).cloned()),
            Entity::Score(claim) => Prior::Score(claim, self.scores.get(&claim).copied()),
            Entity::Flags(id) => Prior::Flags(id, self.flags.get(&id).cloned()),
            Entity::Stake(owner, key) => Prior::Stake(owner, key, self.vault.get(&owner, &key).copied()),
        };
        self.journal.priors.insert(entity, prior);
    }

    /// Undo everything touched since the last commit.
    pub(crate) fn rollback(&mut self) {
        let priors = std::mem::take(&mut self.journal.priors);
        for prior in priors.into_values() {
            self.restore(prior);
        }
    }

    /// Keep the changes and forget the journal.
    pub(crate) fn commit(&mut self) {
        self.journal.priors.clear();
    }

    pub(crate) fn set_next_event_seq(&mut self, seq: u64) {
        self.touch(Entity::Counters);
        self.next_event_seq = seq;
    }

    fn restore(&mut self, prior: Prior) {
        match prior {
            Prior::Config(config) => self.config = config,
            Prior::Access(access) => self.access = access,
            Prior::Counters { next_edge_id, next_event_seq } => {
                self.next_edge_id = next_edge_id;
                self.next_event_seq = next_event_seq;
            }
            Prior::Reserve(balance) => self.vault.reserve_mut().restore(balance),
            Prior::Edge(id, edge) => self.restore_edge(id, edge),
            Prior::Score(claim, Some(score)) => {
                self.scores.insert(claim, score);
            }
            Prior::Score(claim, None) => {
                self.scores.remove(&claim);
            }
            Prior::Flags(id, Some(flags)) => {
                self.flags.insert(id, flags);
            }
            Prior::Flags(id, None) => {
                self.flags.remove(&id);
            }
            Prior::Stake(owner, key, record) => self.vault.restore(owner, key, record),
        }
    }
}
