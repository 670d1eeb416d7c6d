// crates/trellis-graph/src/lifecycle.rs
//
// EdgeLifecycle: validated creation, proposer withdrawal, and privileged
// invalidation of edges, on top of the GraphStore and the StakeVault.
//
// Creation protocol: the proposer first stakes under
// `StakeKey::for_edge(next_edge_id())`, then calls `create_edge`. The whole
// record under that key is locked as the edge's backing.

use serde::{Deserialize, Serialize};
use tracing::info;

use trellis_core::bps::BPS_DENOMINATOR;
use trellis_core::{
    ClaimId, Edge, EdgeId, EdgeStatus, EdgeType, EvidenceRef, GraphEvent, Principal, Registry,
    StakeKey, TrellisError,
};
use trellis_economics::Trl;

use crate::access::Role;
use crate::effects::TxContext;
use crate::journal::Entity;
use crate::state::EngineState;

/// Parameters of an edge assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdge {
    /// The dependency.
    pub source: ClaimId,
    /// The dependent.
    pub target: ClaimId,
    pub edge_type: EdgeType,
    pub evidence: EvidenceRef,
    /// In [0, 10_000].
    pub confidence: u16,
}

impl EngineState {
    pub(crate) fn create_edge(
        &mut self,
        tx: &mut TxContext,
        registry: &dyn Registry,
        req: NewEdge,
        caller: Principal,
    ) -> Result<EdgeId, TrellisError> {
        if req.source == req.target {
            return Err(TrellisError::SelfReference(req.source));
        }
        if u64::from(req.confidence) > BPS_DENOMINATOR {
            return Err(TrellisError::ConfidenceOutOfRange(req.confidence.into()));
        }
        for claim in [req.source, req.target] {
            if !registry.claim_exists(&claim) {
                return Err(TrellisError::ClaimNotFound(claim));
            }
        }
        if let Some(existing) = self.slot_holder(req.source, req.target, req.edge_type) {
            return Err(TrellisError::DuplicateEdge(existing));
        }

        let id = self.next_edge_id;
        let key = StakeKey::for_edge(id);
        let staked = self.vault.amount_of(&caller, &key);
        if staked < self.config.min_edge_stake {
            return Err(TrellisError::InsufficientStake {
                required: self.config.min_edge_stake,
                staked,
            });
        }

        if req.edge_type == EdgeType::Depends
            && self.would_create_cycle(req.source, req.target, self.config.max_cycle_search_depth)
        {
            return Err(TrellisError::CycleDetected);
        }

        self.touch(Entity::Stake(caller, key));
        self.vault.lock(&caller, &key)?;
        self.insert_edge(Edge {
            id,
            source: req.source,
            target: req.target,
            edge_type: req.edge_type,
            status: EdgeStatus::Active,
            proposer: caller,
            evidence: req.evidence,
            stake: staked,
            confidence: req.confidence,
            created_at: tx.now,
            reward_claimed: false,
        });
        self.touch(Entity::Counters);
        self.next_edge_id += 1;

        info!(
            "Edge {} created: {} -> {} ({:?}), confidence {}, stake {}",
            id,
            req.source,
            req.target,
            req.edge_type,
            req.confidence,
            Trl::from_units(staked)
        );
        tx.emit(GraphEvent::EdgeCreated {
            edge_id: id,
            source: req.source,
            target: req.target,
            edge_type: req.edge_type,
            proposer: caller,
            stake: staked,
            confidence: req.confidence,
        });
        Ok(id)
    }

    /// Proposer withdraws an Active edge and gets the full stake back.
    pub(crate) fn remove_edge(&mut self, tx: &mut TxContext, id: EdgeId, caller: Principal) -> Result<u64, TrellisError> {
        let edge = self.edge_or_err(id)?;
        if edge.proposer != caller {
            return Err(TrellisError::NotProposer(id));
        }
        if edge.status != EdgeStatus::Active {
            return Err(TrellisError::InvalidStatusForTransition {
                id,
                status: edge.status,
            });
        }
        let key = edge.stake_key();

        self.transition(id, EdgeStatus::Removed)?;
        self.touch(Entity::Stake(caller, key));
        let refunded = self.vault.refund(&caller, &key)?;
        self.sync_edge_stake(&key);
        tx.credit(caller, refunded);

        info!("Edge {} removed by proposer, refunded {}", id, Trl::from_units(refunded));
        tx.emit(GraphEvent::EdgeRemoved { edge_id: id, refunded });
        Ok(refunded)
    }

    /// Privileged strike-down of an Active or Disputed edge. Resolves any
    /// pending weak-link flags on it.
    pub(crate) fn invalidate_edge(&mut self, tx: &mut TxContext, id: EdgeId, caller: Principal) -> Result<(), TrellisError> {
        self.access.require(Role::Invalidator, &caller)?;
        self.transition(id, EdgeStatus::Invalidated)?;
        self.resolve_flags(tx, id);

        info!("Edge {} invalidated by {}", id, caller);
        tx.emit(GraphEvent::EdgeInvalidated { edge_id: id, by: caller });
        Ok(())
    }
}
