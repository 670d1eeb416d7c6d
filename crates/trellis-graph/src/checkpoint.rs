// crates/trellis-graph/src/checkpoint.rs
//
// Entity-level persistence. Each entity is stored as JSON under its own key:
//
//   meta:config, meta:access, meta:counters, meta:reserve
//   edge:{id}            Edge
//   score:{claim}        (ClaimId, PropagatedScore)
//   flags:{id}           (EdgeId, [WeakLinkFlag])
//   stake:{owner}:{key}  (Principal, StakeKey, StakeRecord)
//
// A call persists only the entities it touched; an entity that no longer
// exists is deleted. Indexes, slots and the backing map are rebuilt from
// the edges on load.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use trellis_core::{
    ClaimId, Edge, EdgeId, Principal, PropagatedScore, SequencedEvent, StakeKey, StateBatch, TrellisError,
    WeakLinkFlag,
};
use trellis_economics::StakeRecord;

use crate::access::AccessControl;
use crate::config::EngineConfig;
use crate::journal::Entity;
use crate::state::EngineState;

const CONFIG_KEY: &str = "meta:config";
const ACCESS_KEY: &str = "meta:access";
const COUNTERS_KEY: &str = "meta:counters";
const RESERVE_KEY: &str = "meta:reserve";

#[derive(Debug, Serialize, Deserialize)]
struct Counters {
    next_edge_id: EdgeId,
    next_event_seq: u64,
}

fn entity_key(entity: &Entity) -> String {
    match entity {
        Entity::Config => CONFIG_KEY.to_string(),
        Entity::Access => ACCESS_KEY.to_string(),
        Entity::Counters => COUNTERS_KEY.to_string(),
        Entity::Reserve => RESERVE_KEY.to_string(),
        // Zero-padded so edges load in id order from a sorted store.
        Entity::Edge(id) => format!("edge:{:020}", id),
        Entity::Score(claim) => format!("score:{}", claim),
        Entity::Flags(id) => format!("flags:{:020}", id),
        Entity::Stake(owner, key) => format!("stake:{}:{}", owner, key.to_hex()),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, TrellisError> {
    Ok(serde_json::to_vec(value)?)
}

/// Current encoding of `entity`, or `None` if it no longer exists.
fn value_of(state: &EngineState, entity: Entity) -> Result<Option<Vec<u8>>, TrellisError> {
    let value = match entity {
        Entity::Config => Some(encode(&state.config)?),
        Entity::Access => Some(encode(&state.access)?),
        Entity::Counters => Some(encode(&Counters {
            next_edge_id: state.next_edge_id,
            next_event_seq: state.next_event_seq,
        })?),
        Entity::Reserve => Some(encode(&state.vault.reserve().balance())?),
        Entity::Edge(id) => state.edges.get(&id).map(encode).transpose()?,
        Entity::Score(claim) => state.scores.get(&claim).map(|s| encode(&(claim, s))).transpose()?,
        Entity::Flags(id) => state.flags.get(&id).map(|f| encode(&(id, f))).transpose()?,
        Entity::Stake(owner, key) => state
            .vault
            .get(&owner, &key)
            .map(|r| encode(&(owner, key, r)))
            .transpose()?,
    };
    Ok(value)
}

fn batch_for(
    state: &EngineState,
    entities: impl IntoIterator<Item = Entity>,
    events: &[SequencedEvent],
) -> Result<StateBatch, TrellisError> {
    let mut batch = StateBatch {
        events: events.to_vec(),
        ..StateBatch::default()
    };
    for entity in entities {
        let key = entity_key(&entity);
        match value_of(state, entity)? {
            Some(value) => batch.puts.push((key, value)),
            None => batch.deletes.push(key),
        }
    }
    Ok(batch)
}

/// Entities touched by the call in progress, plus its events.
pub(crate) fn changes(state: &EngineState, events: &[SequencedEvent]) -> Result<StateBatch, TrellisError> {
    batch_for(state, state.journal.touched(), events)
}

/// Every entity in `state`, for the first checkpoint of a fresh store.
pub(crate) fn snapshot(state: &EngineState) -> Result<StateBatch, TrellisError> {
    let mut entities = vec![Entity::Config, Entity::Access, Entity::Counters, Entity::Reserve];
    entities.extend(state.edges.keys().map(|id| Entity::Edge(*id)));
    entities.extend(state.scores.keys().map(|claim| Entity::Score(*claim)));
    entities.extend(state.flags.keys().map(|id| Entity::Flags(*id)));
    entities.extend(state.vault.records().map(|(owner, key, _)| Entity::Stake(owner, key)));
    batch_for(state, entities, &[])
}

fn missing(key: &str) -> TrellisError {
    TrellisError::Storage(format!("store is missing {}", key))
}

/// Rebuild the state from stored entries. `None` for an empty store.
pub(crate) fn restore(entries: Vec<(String, Vec<u8>)>) -> Result<Option<EngineState>, TrellisError> {
    let mut config: Option<EngineConfig> = None;
    let mut access: Option<AccessControl> = None;
    let mut counters: Option<Counters> = None;
    let mut reserve = 0u64;
    let mut edges: Vec<Edge> = Vec::new();
    let mut scores: Vec<(ClaimId, PropagatedScore)> = Vec::new();
    let mut flags: Vec<(EdgeId, Vec<WeakLinkFlag>)> = Vec::new();
    let mut stakes: Vec<(Principal, StakeKey, StakeRecord)> = Vec::new();

    for (key, value) in entries {
        let kind = key.split_once(':').map(|(kind, _)| kind).unwrap_or(key.as_str());
        match (kind, key.as_str()) {
            (_, CONFIG_KEY) => config = Some(serde_json::from_slice(&value)?),
            (_, ACCESS_KEY) => access = Some(serde_json::from_slice(&value)?),
            (_, COUNTERS_KEY) => counters = Some(serde_json::from_slice(&value)?),
            (_, RESERVE_KEY) => reserve = serde_json::from_slice(&value)?,
            ("edge", _) => edges.push(serde_json::from_slice(&value)?),
            ("score", _) => scores.push(serde_json::from_slice(&value)?),
            ("flags", _) => flags.push(serde_json::from_slice(&value)?),
            ("stake", _) => stakes.push(serde_json::from_slice(&value)?),
            _ => warn!("Ignoring unknown store entry {}", key),
        }
    }

    let Some(config) = config else {
        return Ok(None);
    };
    let access = access.ok_or_else(|| missing(ACCESS_KEY))?;
    let counters = counters.ok_or_else(|| missing(COUNTERS_KEY))?;

    let mut state = EngineState::with_access(config, access);
    edges.sort_by_key(|edge| edge.id);
    let edge_count = edges.len();
    for edge in edges {
        state.insert_edge(edge);
    }
    state.scores.extend(scores);
    state.flags.extend(flags);
    for (owner, key, record) in stakes {
        state.vault.restore(owner, key, Some(record));
    }
    state.vault.reserve_mut().restore(reserve);
    state.next_edge_id = counters.next_edge_id;
    state.next_event_seq = counters.next_event_seq;
    state.commit();

    debug!("Restored {} edges, next edge id {}", edge_count, state.next_edge_id);
    Ok(Some(state))
}
