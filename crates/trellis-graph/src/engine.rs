// crates/trellis-graph/src/engine.rs
//
// The Engine: the single entry point wrapping the state aggregate, its
// collaborators, and the transaction boundary.
//
// Every public mutating call runs through `transact`:
//   1. read the clock once
//   2. run the operation against the live state, journaling every entity it
//      touches and recording ledger effects and events in a `TxContext`
//   3. on error, roll the journal back; nothing else happened
//   4. apply ledger effects (debits first); on failure, compensate and roll
//      back
//   5. sequence the events and persist the touched entities and the events
//      as one batch; on failure, revert the ledger effects and roll back
//   6. append and broadcast the events
//
// Calls are serialized by `&mut self`; the engine has no internal
// concurrency and no suspension points.

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use trellis_core::{
    ClaimId, Clock, Edge, EdgeId, GraphEvent, Principal, PropagatedScore, Registry,
    SequencedEvent, StakeKey, StateStore, SubScoreWeights, TokenLedger, TrellisError,
    WeakLinkFlag,
};
use trellis_economics::{RewardSchedule, SlashResult, StakeRecord};

use crate::access::Role;
use crate::config::EngineConfig;
use crate::dispute::DisputeOutcome;
use crate::effects::TxContext;
use crate::checkpoint;
use crate::events::EventLog;
use crate::journal::Entity;
use crate::lifecycle::NewEdge;
use crate::state::EngineState;

/// External systems the engine reads from or moves value through.
pub struct Collaborators {
    pub registry: Box<dyn Registry>,
    pub ledger: Box<dyn TokenLedger>,
    pub clock: Box<dyn Clock>,
}

impl Collaborators {
    pub fn new(
        registry: impl Registry + 'static,
        ledger: impl TokenLedger + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            registry: Box::new(registry),
            ledger: Box::new(ledger),
            clock: Box::new(clock),
        }
    }
}

pub struct Engine {
    state: EngineState,
    registry: Box<dyn Registry>,
    ledger: Box<dyn TokenLedger>,
    clock: Box<dyn Clock>,
    store: Option<Box<dyn StateStore>>,
    events: EventLog,
}

impl Engine {
    /// A fresh, unpersisted engine with `admin` as its only administrator.
    pub fn new(config: EngineConfig, admin: Principal, collaborators: Collaborators) -> Result<Self, TrellisError> {
        config.validate()?;
        Ok(Self::from_parts(EngineState::new(config, admin), collaborators, None))
    }

    /// Resume from `store` if it holds a state; otherwise start fresh with
    /// `config` and `admin` and write the initial checkpoint.
    pub fn open(
        mut store: Box<dyn StateStore>,
        config: EngineConfig,
        admin: Principal,
        collaborators: Collaborators,
    ) -> Result<Self, TrellisError> {
        let state = match checkpoint::restore(store.load_entries()?)? {
            Some(state) => {
                info!(
                    "Resumed engine state: {} edges, next edge id {}",
                    state.edge_count(),
                    state.next_edge_id()
                );
                state
            }
            None => {
                config.validate()?;
                let state = EngineState::new(config, admin);
                store.commit(checkpoint::snapshot(&state)?)?;
                info!("Initialized new engine state with admin {}", admin);
                state
            }
        };
        Ok(Self::from_parts(state, collaborators, Some(store)))
    }

    fn from_parts(
        state: EngineState,
        collaborators: Collaborators,
        store: Option<Box<dyn StateStore>>,
    ) -> Self {
        let events = EventLog::starting_at(state.next_event_seq);
        Self {
            state,
            registry: collaborators.registry,
            ledger: collaborators.ledger,
            clock: collaborators.clock,
            store,
            events,
        }
    }

    fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut EngineState, &mut TxContext, &dyn Registry) -> Result<T, TrellisError>,
    ) -> Result<T, TrellisError> {
        let mut tx = TxContext::new(self.clock.now());

        let value = match f(&mut self.state, &mut tx, self.registry.as_ref()) {
            Ok(value) => value,
            Err(e) => {
                self.state.rollback();
                warn!("{} rejected ({}): {}", op, e.code(), e);
                return Err(e);
            }
        };

        if let Err(e) = tx.apply_effects(self.ledger.as_mut()) {
            self.state.rollback();
            warn!("{} rolled back, ledger refused an effect ({}): {}", op, e.code(), e);
            return Err(e);
        }

        let staged = self.events.stage(tx.now, tx.take_events());
        if let Some(last) = staged.last() {
            self.state.set_next_event_seq(last.seq + 1);
        }
        if let Err(e) = self.persist(&staged) {
            tx.revert_effects(self.ledger.as_mut());
            self.state.rollback();
            error!("{} rolled back, could not be persisted: {}", op, e);
            return Err(e);
        }

        self.state.commit();
        self.events.append(staged);
        Ok(value)
    }

    /// Write the entities the call touched, and its events, as one batch.
    fn persist(&mut self, staged: &[SequencedEvent]) -> Result<(), TrellisError> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        let batch = checkpoint::changes(&self.state, staged)?;
        if batch.is_empty() {
            return Ok(());
        }
        store.commit(batch)
    }

    // -----------------------------------------------------------------
    // StakeVault
    // -----------------------------------------------------------------

    /// Move `amount` from the owner's balance into the vault under `key`.
    /// Returns the record's new total.
    pub fn stake(&mut self, key: StakeKey, amount: u64, owner: Principal) -> Result<u64, TrellisError> {
        self.transact("stake", |state, tx, _| state.stake(tx, key, amount, owner))
    }

    /// Withdraw an unlocked record in full. Returns the amount returned.
    pub fn unstake(&mut self, key: StakeKey, owner: Principal) -> Result<u64, TrellisError> {
        self.transact("unstake", |state, tx, _| state.unstake(tx, key, owner))
    }

    pub fn vault_lock(&mut self, caller: Principal, owner: Principal, key: StakeKey) -> Result<(), TrellisError> {
        self.transact("vault_lock", |state, _, _| state.vault_lock(caller, owner, key))
    }

    pub fn vault_unlock(&mut self, caller: Principal, owner: Principal, key: StakeKey) -> Result<(), TrellisError> {
        self.transact("vault_unlock", |state, _, _| state.vault_unlock(caller, owner, key))
    }

    pub fn vault_slash(&mut self, caller: Principal, owner: Principal, key: StakeKey, bps: u64) -> Result<SlashResult, TrellisError> {
        self.transact("vault_slash", |state, _, _| state.vault_slash(caller, owner, key, bps))
    }

    pub fn vault_transfer(
        &mut self,
        caller: Principal,
        owner: Principal,
        key: StakeKey,
        amount: u64,
        recipient: Principal,
    ) -> Result<(), TrellisError> {
        self.transact("vault_transfer", |state, tx, _| {
            state.vault_transfer(tx, caller, owner, key, amount, recipient)
        })
    }

    pub fn vault_refund(&mut self, caller: Principal, owner: Principal, key: StakeKey) -> Result<u64, TrellisError> {
        self.transact("vault_refund", |state, tx, _| state.vault_refund(tx, caller, owner, key))
    }

    pub fn sweep_slashed(&mut self, caller: Principal, recipient: Principal, amount: u64) -> Result<(), TrellisError> {
        self.transact("sweep_slashed", |state, tx, _| state.sweep_slashed(tx, caller, recipient, amount))
    }

    // -----------------------------------------------------------------
    // EdgeLifecycle
    // -----------------------------------------------------------------

    /// Create an edge backed by the stake the caller already deposited
    /// under `StakeKey::for_edge(self.next_edge_id())`.
    pub fn create_edge(&mut self, req: NewEdge, caller: Principal) -> Result<EdgeId, TrellisError> {
        self.transact("create_edge", |state, tx, registry| state.create_edge(tx, registry, req, caller))
    }

    /// Stake `amount` under the next edge's key and create the edge, as one
    /// call.
    pub fn stake_and_create_edge(&mut self, req: NewEdge, amount: u64, caller: Principal) -> Result<EdgeId, TrellisError> {
        self.transact("stake_and_create_edge", |state, tx, registry| {
            let key = StakeKey::for_edge(state.next_edge_id());
            state.stake(tx, key, amount, caller)?;
            state.create_edge(tx, registry, req, caller)
        })
    }

    /// Proposer withdraws an Active edge. Returns the refunded stake.
    pub fn remove_edge(&mut self, id: EdgeId, caller: Principal) -> Result<u64, TrellisError> {
        self.transact("remove_edge", |state, tx, _| state.remove_edge(tx, id, caller))
    }

    pub fn invalidate_edge(&mut self, id: EdgeId, caller: Principal) -> Result<(), TrellisError> {
        self.transact("invalidate_edge", |state, tx, _| state.invalidate_edge(tx, id, caller))
    }

    // -----------------------------------------------------------------
    // ScorePropagation
    // -----------------------------------------------------------------

    pub fn propagate_score(&mut self, claim: ClaimId, caller: Principal) -> Result<PropagatedScore, TrellisError> {
        self.transact("propagate_score", |state, tx, registry| {
            state.propagate_score(tx, registry, claim, caller)
        })
    }

    /// Propagate `claims` in the order given. All or nothing.
    pub fn batch_propagate_scores(&mut self, claims: &[ClaimId], caller: Principal) -> Result<Vec<PropagatedScore>, TrellisError> {
        self.transact("batch_propagate_scores", |state, tx, registry| {
            state.batch_propagate_scores(tx, registry, claims, caller)
        })
    }

    // -----------------------------------------------------------------
    // DisputeResolution and WeakLinkBounty
    // -----------------------------------------------------------------

    pub fn dispute_edge(&mut self, id: EdgeId, challenger: Principal) -> Result<DisputeOutcome, TrellisError> {
        self.transact("dispute_edge", |state, tx, _| state.dispute_edge(tx, id, challenger))
    }

    pub fn flag_weak_link(&mut self, id: EdgeId, flagger: Principal) -> Result<(), TrellisError> {
        self.transact("flag_weak_link", |state, tx, _| state.flag_weak_link(tx, id, flagger))
    }

    /// One-time reward for an edge that stayed Active through maturity.
    pub fn claim_edge_reward(&mut self, id: EdgeId, caller: Principal) -> Result<u64, TrellisError> {
        self.transact("claim_edge_reward", |state, tx, _| state.claim_edge_reward(tx, id, caller))
    }

    // -----------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------

    pub fn grant_role(&mut self, caller: Principal, role: Role, who: Principal) -> Result<bool, TrellisError> {
        self.transact("grant_role", |state, _, _| {
            state.access.require(Role::Admin, &caller)?;
            state.touch(Entity::Access);
            let granted = state.access.grant(role, who);
            info!("Admin {} granted {} to {}", caller, role, who);
            Ok(granted)
        })
    }

    pub fn revoke_role(&mut self, caller: Principal, role: Role, who: Principal) -> Result<bool, TrellisError> {
        self.transact("revoke_role", |state, _, _| {
            state.access.require(Role::Admin, &caller)?;
            state.touch(Entity::Access);
            let revoked = state.access.revoke(role, &who)?;
            info!("Admin {} revoked {} from {}", caller, role, who);
            Ok(revoked)
        })
    }

    fn update_config(
        &mut self,
        caller: Principal,
        field: &'static str,
        apply: impl FnOnce(&mut EngineConfig),
    ) -> Result<(), TrellisError> {
        self.transact("update_config", |state, tx, _| {
            state.access.require(Role::Admin, &caller)?;
            let mut updated = state.config.clone();
            apply(&mut updated);
            updated.validate()?;
            state.touch(Entity::Config);
            state.config = updated;
            info!("Config {} updated by {}", field, caller);
            tx.emit(GraphEvent::ConfigUpdated {
                field: field.to_string(),
                by: caller,
            });
            Ok(())
        })
    }

    pub fn set_min_edge_stake(&mut self, caller: Principal, amount: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "min_edge_stake", |c| c.min_edge_stake = amount)
    }

    pub fn set_max_cycle_search_depth(&mut self, caller: Principal, depth: u32) -> Result<(), TrellisError> {
        self.update_config(caller, "max_cycle_search_depth", |c| c.max_cycle_search_depth = depth)
    }

    pub fn set_propagation_params(&mut self, caller: Principal, floor_bps: u64, damping_bps: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "propagation", |c| {
            c.propagation_floor_bps = floor_bps;
            c.propagation_damping_bps = damping_bps;
        })
    }

    pub fn set_contradiction_params(&mut self, caller: Principal, penalty_bps: u64, floor_bps: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "contradiction", |c| {
            c.contradiction_penalty_bps = penalty_bps;
            c.contradiction_floor_bps = floor_bps;
        })
    }

    pub fn set_weak_link_window(&mut self, caller: Principal, secs: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "weak_link_window_secs", |c| c.weak_link_window_secs = secs)
    }

    pub fn set_edge_maturity_period(&mut self, caller: Principal, secs: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "edge_maturity_secs", |c| c.edge_maturity_secs = secs)
    }

    pub fn set_dispute_params(&mut self, caller: Principal, slash_bps: u64, challenger_share_bps: u64) -> Result<(), TrellisError> {
        self.update_config(caller, "dispute", |c| {
            c.dispute_slash_bps = slash_bps;
            c.challenger_share_bps = challenger_share_bps;
        })
    }

    pub fn set_reward_schedule(&mut self, caller: Principal, rewards: RewardSchedule) -> Result<(), TrellisError> {
        self.update_config(caller, "rewards", |c| c.rewards = rewards)
    }

    pub fn set_intrinsic_weights(&mut self, caller: Principal, weights: [u64; 4]) -> Result<(), TrellisError> {
        self.update_config(caller, "intrinsic_weights", |c| c.intrinsic_weights = SubScoreWeights(weights))
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        self.state.config()
    }

    pub fn next_edge_id(&self) -> EdgeId {
        self.state.next_edge_id()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.state.edge(id)
    }

    pub fn edges_depending_on(&self, claim: &ClaimId) -> Vec<&Edge> {
        self.state.edges_depending_on(claim)
    }

    pub fn edges_depended_on_by(&self, claim: &ClaimId) -> Vec<&Edge> {
        self.state.edges_depended_on_by(claim)
    }

    pub fn propagated_score(&self, claim: &ClaimId) -> Option<&PropagatedScore> {
        self.state.propagated_score(claim)
    }

    pub fn flags(&self, edge: EdgeId) -> &[WeakLinkFlag] {
        self.state.flags(edge)
    }

    pub fn stake_of(&self, owner: &Principal, key: &StakeKey) -> Option<&StakeRecord> {
        self.state.stake_of(owner, key)
    }

    /// Slashed collateral currently held by the vault.
    pub fn slashed_reserve(&self) -> u64 {
        self.state.vault().reserve().balance()
    }

    pub fn ledger(&self) -> &dyn TokenLedger {
        self.ledger.as_ref()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SequencedEvent> {
        self.events.subscribe()
    }
}
