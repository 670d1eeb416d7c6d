// crates/trellis-graph/src/test_support.rs
//
// Shared fixtures for unit tests.

use trellis_core::{ClaimId, Edge, EdgeId, EdgeStatus, EdgeType, IntrinsicScores, Principal, StakeKey};
use trellis_store::MemoryRegistry;

use crate::config::EngineConfig;
use crate::effects::TxContext;
use crate::lifecycle::NewEdge;
use crate::state::EngineState;

pub const ADMIN: Principal = Principal::from_bytes([0xAD; 32]);
pub const ALICE: Principal = Principal::from_bytes([0xA1; 32]);
pub const BOB: Principal = Principal::from_bytes([0xB0; 32]);
pub const CAROL: Principal = Principal::from_bytes([0xC0; 32]);

pub fn state() -> EngineState {
    EngineState::new(EngineConfig::default(), ADMIN)
}

/// Registry with `n` claims whose sub-scores are all `score`.
pub fn registry_with(n: usize, score: u16) -> (MemoryRegistry, Vec<ClaimId>) {
    let registry = MemoryRegistry::new();
    let claims = (0..n)
        .map(|_| registry.register(IntrinsicScores([score; 4])).unwrap())
        .collect();
    (registry, claims)
}

/// Insert an Active edge directly, bypassing stake and validation.
pub fn raw_edge(state: &mut EngineState, source: ClaimId, target: ClaimId, edge_type: EdgeType, confidence: u16) -> EdgeId {
    let id = state.next_edge_id;
    state.next_edge_id += 1;
    state.insert_edge(Edge {
        id,
        source,
        target,
        edge_type,
        status: EdgeStatus::Active,
        proposer: ALICE,
        evidence: [0; 32],
        stake: 0,
        confidence,
        created_at: 0,
        reward_claimed: false,
    });
    id
}

pub fn new_edge(source: ClaimId, target: ClaimId, edge_type: EdgeType, confidence: u16) -> NewEdge {
    NewEdge {
        source,
        target,
        edge_type,
        evidence: [7; 32],
        confidence,
    }
}

/// Stake the minimum under the next edge's key and create the edge.
pub fn staked_edge(
    state: &mut EngineState,
    tx: &mut TxContext,
    registry: &MemoryRegistry,
    req: NewEdge,
    proposer: Principal,
) -> EdgeId {
    let key = StakeKey::for_edge(state.next_edge_id());
    let amount = state.config().min_edge_stake;
    state.stake(tx, key, amount, proposer).unwrap();
    state.create_edge(tx, registry, req, proposer).unwrap()
}
