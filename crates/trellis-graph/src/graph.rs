// crates/trellis-graph/src/graph.rs
//
// GraphStore: edge records, the two adjacency indexes, dedup slots, the
// stake-key backing index, and the bounded cycle search over Active Depends
// edges.
//
// Edge direction: `source` is the dependency, `target` the dependent. The
// by-dependent index (`depends_on`) is keyed by target; the by-dependency
// index (`depended_on_by`) is keyed by source.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use trellis_core::{ClaimId, Edge, EdgeId, EdgeStatus, EdgeType, StakeKey, TrellisError};

use crate::journal::Entity;
use crate::state::EngineState;

impl EngineState {
    /// Store a new edge and index it under both endpoints. Claims its slot
    /// if its status holds one.
    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        let id = edge.id;
        self.touch(Entity::Edge(id));
        if edge.status.occupies_slot() {
            self.slots.insert(edge.slot(), id);
        }
        self.backing.insert(edge.stake_key(), id);
        self.depends_on.entry(edge.target).or_default().push(id);
        self.depended_on_by.entry(edge.source).or_default().push(id);
        self.edges.insert(id, edge);
    }

    pub(crate) fn edge_or_err(&self, id: EdgeId) -> Result<&Edge, TrellisError> {
        self.edges.get(&id).ok_or(TrellisError::EdgeNotFound(id))
    }

    /// Mutable access to an edge, journaled.
    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, TrellisError> {
        if !self.edges.contains_key(&id) {
            return Err(TrellisError::EdgeNotFound(id));
        }
        self.touch(Entity::Edge(id));
        self.edges.get_mut(&id).ok_or(TrellisError::EdgeNotFound(id))
    }

    /// The Active edge `key` backs, if any.
    pub(crate) fn active_edge_backed_by(&self, key: &StakeKey) -> Option<EdgeId> {
        self.backing
            .get(key)
            .copied()
            .filter(|id| self.edges.get(id).is_some_and(Edge::is_active))
    }

    /// Put edge `id` back to `prior`, undoing its index entries if it did
    /// not exist before.
    pub(crate) fn restore_edge(&mut self, id: EdgeId, prior: Option<Edge>) {
        if let Some(current) = self.edges.remove(&id) {
            let slot = current.slot();
            if self.slots.get(&slot) == Some(&id) {
                self.slots.remove(&slot);
            }
            if prior.is_none() {
                unindex(&mut self.depends_on, current.target, id);
                unindex(&mut self.depended_on_by, current.source, id);
                self.backing.remove(&current.stake_key());
            }
        }
        if let Some(edge) = prior {
            if edge.status.occupies_slot() {
                self.slots.insert(edge.slot(), id);
            }
            self.edges.insert(id, edge);
        }
    }

    /// Move an edge to `next`, enforcing the edge state machine and freeing
    /// its dedup slot when it leaves Active/Disputed.
    pub(crate) fn transition(&mut self, id: EdgeId, next: EdgeStatus) -> Result<&Edge, TrellisError> {
        let edge = self.edge_mut(id)?;
        if !edge.status.can_transition_to(next) {
            return Err(TrellisError::InvalidStatusForTransition {
                id,
                status: edge.status,
            });
        }
        edge.status = next;
        let slot = edge.slot();
        if !next.occupies_slot() && self.slots.get(&slot) == Some(&id) {
            self.slots.remove(&slot);
        }
        Ok(&self.edges[&id])
    }

    /// The edge currently holding the (source, target, type) slot, if any.
    pub(crate) fn slot_holder(&self, source: ClaimId, target: ClaimId, edge_type: EdgeType) -> Option<EdgeId> {
        self.slots.get(&(source, target, edge_type)).copied()
    }

    /// Active edges of `edge_type` whose target is `claim`, in creation order.
    pub(crate) fn active_incoming(&self, claim: &ClaimId, edge_type: EdgeType) -> impl Iterator<Item = &Edge> {
        self.depends_on
            .get(claim)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.edges.get(id))
            .filter(move |e| e.is_active() && e.edge_type == edge_type)
    }

    /// Active Depends edges whose source is `claim`.
    fn active_dependents(&self, claim: &ClaimId) -> impl Iterator<Item = &Edge> {
        self.depended_on_by
            .get(claim)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.edges.get(id))
            .filter(|e| e.is_active() && e.edge_type == EdgeType::Depends)
    }

    /// Would adding a Depends edge `source -> target` close a cycle?
    ///
    /// Searches outward from `target` along Active Depends edges (towards
    /// claims that depend on it) for `source`. Exploration is breadth-first
    /// and stops `max_depth` hops from `target`; anything further away is
    /// assumed cycle-free.
    pub(crate) fn would_create_cycle(&self, source: ClaimId, target: ClaimId, max_depth: u32) -> bool {
        if source == target {
            return true;
        }
        let mut visited: HashSet<ClaimId> = HashSet::from([target]);
        let mut frontier: VecDeque<(ClaimId, u32)> = VecDeque::from([(target, 0)]);

        while let Some((node, depth)) = frontier.pop_front() {
            if depth >= max_depth {
                debug!(
                    "Cycle search bound {} reached at {}; assuming no cycle beyond it",
                    max_depth, node
                );
                continue;
            }
            for edge in self.active_dependents(&node) {
                if edge.target == source {
                    debug!("Cycle found: {} reaches {} via edge {}", target, source, edge.id);
                    return true;
                }
                if visited.insert(edge.target) {
                    frontier.push_back((edge.target, depth + 1));
                }
            }
        }
        false
    }
}

fn unindex(index: &mut HashMap<ClaimId, Vec<EdgeId>>, claim: ClaimId, id: EdgeId) {
    if let Some(ids) = index.get_mut(&claim) {
        ids.retain(|e| *e != id);
        if ids.is_empty() {
            index.remove(&claim);
        }
    }
}
