//! End-to-end engine scenarios over in-memory collaborators: edge lifecycle,
//! score propagation, disputes, bounties, and the transaction boundary.

use trellis_core::{
    ClaimId, EdgeStatus, EdgeType, IntrinsicScores, ManualClock, Principal, StakeKey, TrellisError,
};
use trellis_economics::{InMemoryLedger, RewardSchedule, UNITS_PER_TRL};
use trellis_graph::{Collaborators, Engine, EngineConfig, NewEdge, Role};
use trellis_store::MemoryRegistry;

const ADMIN: Principal = Principal::from_bytes([0xAD; 32]);
const ALICE: Principal = Principal::from_bytes([0xA1; 32]);
const BOB: Principal = Principal::from_bytes([0xB0; 32]);
const CAROL: Principal = Principal::from_bytes([0xC0; 32]);
const BROKE: Principal = Principal::from_bytes([0x00; 32]);

const OPENING_BALANCE: u64 = 1_000 * UNITS_PER_TRL;
const START: u64 = 1_700_000_000;
const DAY: u64 = 24 * 60 * 60;

struct Harness {
    engine: Engine,
    registry: MemoryRegistry,
    clock: ManualClock,
}

impl Harness {
    fn new() -> Self {
        let registry = MemoryRegistry::new();
        let clock = ManualClock::new(START);
        let ledger = InMemoryLedger::with_balances([
            (ALICE, OPENING_BALANCE),
            (BOB, OPENING_BALANCE),
            (CAROL, OPENING_BALANCE),
        ]);
        let collaborators = Collaborators::new(registry.clone(), ledger, clock.clone());
        let engine = Engine::new(EngineConfig::default(), ADMIN, collaborators).unwrap();
        Self {
            engine,
            registry,
            clock,
        }
    }

    fn claim(&self, score: u16) -> ClaimId {
        self.registry.register(IntrinsicScores([score; 4])).unwrap()
    }

    fn min_stake(&self) -> u64 {
        self.engine.config().min_edge_stake
    }

    fn edge(&mut self, source: ClaimId, target: ClaimId, edge_type: EdgeType, confidence: u16, who: Principal) -> u64 {
        let amount = self.min_stake();
        self.engine
            .stake_and_create_edge(request(source, target, edge_type, confidence), amount, who)
            .unwrap()
    }

    fn balance(&self, who: &Principal) -> u64 {
        self.engine.ledger().balance_of(who)
    }
}

fn request(source: ClaimId, target: ClaimId, edge_type: EdgeType, confidence: u16) -> NewEdge {
    NewEdge {
        source,
        target,
        edge_type,
        evidence: [1; 32],
        confidence,
    }
}

#[test]
fn test_two_step_creation_protocol() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));

    let key = StakeKey::for_edge(h.engine.next_edge_id());
    let min = h.min_stake();
    assert_eq!(h.engine.stake(key, min, ALICE).unwrap(), min);
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE - min);

    let id = h.engine.create_edge(request(a, b, EdgeType::Depends, 8_000), ALICE).unwrap();
    assert_eq!(id, 1);
    assert!(h.engine.stake_of(&ALICE, &key).unwrap().locked);
    assert_eq!(h.engine.unstake(key, ALICE), Err(TrellisError::StakeLocked));
}

#[test]
fn test_stake_round_trip() {
    let mut h = Harness::new();
    let key = StakeKey([4; 32]);
    h.engine.stake(key, 30 * UNITS_PER_TRL, BOB).unwrap();
    assert_eq!(h.engine.stake(key, 12 * UNITS_PER_TRL, BOB).unwrap(), 42 * UNITS_PER_TRL);
    assert_eq!(h.engine.unstake(key, BOB).unwrap(), 42 * UNITS_PER_TRL);
    assert!(h.engine.stake_of(&BOB, &key).is_none());
    assert_eq!(h.balance(&BOB), OPENING_BALANCE);
    assert_eq!(h.engine.unstake(key, BOB), Err(TrellisError::NoStake));
    assert!(matches!(h.engine.stake(key, 0, BOB), Err(TrellisError::InvalidAmount(_))));
}

#[test]
fn test_graph_stays_acyclic() {
    let mut h = Harness::new();
    let claims: Vec<ClaimId> = (0..4).map(|_| h.claim(5_000)).collect();
    for pair in claims.windows(2) {
        h.edge(pair[0], pair[1], EdgeType::Depends, 9_000, ALICE);
    }

    let min = h.min_stake();
    let err = h
        .engine
        .stake_and_create_edge(request(claims[3], claims[0], EdgeType::Depends, 9_000), min, BOB)
        .unwrap_err();
    assert_eq!(err, TrellisError::CycleDetected);
    // The failed call staked nothing.
    assert_eq!(h.balance(&BOB), OPENING_BALANCE);

    // Removing a link re-opens the reverse direction.
    h.engine.remove_edge(2, ALICE).unwrap();
    h.edge(claims[3], claims[0], EdgeType::Depends, 9_000, BOB);
}

#[test]
fn test_chain_propagation() {
    let mut h = Harness::new();
    let axiom = h.claim(8_200);
    let derived = h.claim(8_200);
    let contested = h.claim(8_200);
    h.edge(axiom, derived, EdgeType::Depends, 9_000, ALICE);
    h.edge(axiom, contested, EdgeType::Supports, 9_000, ALICE);
    h.edge(derived, contested, EdgeType::Contradicts, 9_000, BOB);

    let scores = h
        .engine
        .batch_propagate_scores(&[axiom, derived, contested], CAROL)
        .unwrap();

    assert_eq!(scores[0].chain_score, 8_200);
    assert_eq!(scores[0].depth, 0);
    assert_eq!(scores[0].weakest_link_edge, None);

    assert_eq!(scores[1].chain_score, 7_166);
    assert_eq!(scores[1].depth, 1);
    assert_eq!(scores[1].weakest_link_edge, Some(1));

    assert_eq!(scores[2].chain_score, 6_970);
    assert_eq!(h.engine.propagated_score(&derived), Some(&scores[1]));

    let incentive = h.engine.config().rewards.propagation_incentive;
    assert_eq!(h.balance(&CAROL), OPENING_BALANCE + 3 * incentive);
}

#[test]
fn test_propagation_is_idempotent() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(6_000), h.claim(9_000));
    h.edge(a, b, EdgeType::Depends, 7_000, ALICE);
    h.engine.propagate_score(a, BOB).unwrap();

    let first = h.engine.propagate_score(b, BOB).unwrap();
    assert_eq!(h.engine.propagate_score(b, BOB).unwrap(), first);
    h.clock.advance(60);
    let second = h.engine.propagate_score(b, BOB).unwrap();
    assert_eq!(first.chain_score, second.chain_score);
    assert_eq!(first.weakest_link_edge, second.weakest_link_edge);
    assert_eq!(second.updated_at, first.updated_at + 60);
}

#[test]
fn test_dispute_economics_and_sweep() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let id = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);

    let outcome = h.engine.dispute_edge(id, BOB).unwrap();
    assert_eq!(outcome.slashed, 10 * UNITS_PER_TRL);
    assert_eq!(outcome.challenger_payout, 54 * UNITS_PER_TRL);
    assert_eq!(outcome.remaining_stake, 36 * UNITS_PER_TRL);

    let reward = h.engine.config().rewards.challenger_reward;
    assert_eq!(h.balance(&BOB), OPENING_BALANCE + 54 * UNITS_PER_TRL + reward);
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE - 100 * UNITS_PER_TRL);
    assert_eq!(h.engine.slashed_reserve(), 10 * UNITS_PER_TRL);
    assert_eq!(h.engine.edge(id).unwrap().status, EdgeStatus::Disputed);

    // A Disputed edge no longer backs its target.
    h.engine.propagate_score(a, CAROL).unwrap();
    assert_eq!(h.engine.propagate_score(b, CAROL).unwrap().depth, 0);

    assert!(matches!(
        h.engine.sweep_slashed(BOB, BOB, 1),
        Err(TrellisError::NotAuthorized(_))
    ));
    h.engine.sweep_slashed(ADMIN, CAROL, 4 * UNITS_PER_TRL).unwrap();
    assert_eq!(h.engine.slashed_reserve(), 6 * UNITS_PER_TRL);
    assert!(h.engine.sweep_slashed(ADMIN, CAROL, 7 * UNITS_PER_TRL).is_err());
}

#[test]
fn test_weak_link_bounty_window() {
    let mut h = Harness::new();
    let (a, b, c) = (h.claim(5_000), h.claim(5_000), h.claim(5_000));
    let early = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    let late = h.edge(b, c, EdgeType::Depends, 9_000, ALICE);
    let window = h.engine.config().weak_link_window_secs;
    let bounty = h.engine.config().rewards.weak_link_bounty;

    h.engine.flag_weak_link(early, CAROL).unwrap();
    h.engine.flag_weak_link(late, CAROL).unwrap();
    assert_eq!(h.engine.flag_weak_link(early, CAROL), Err(TrellisError::AlreadyFlagged(early)));

    // Exactly at the window edge: rewarded.
    h.clock.advance(window);
    h.engine.grant_role(ADMIN, Role::Invalidator, ADMIN).unwrap();
    h.engine.invalidate_edge(early, ADMIN).unwrap();
    assert_eq!(h.balance(&CAROL), OPENING_BALANCE + bounty);
    assert!(h.engine.flags(early)[0].rewarded);

    // One second past it: resolved without reward.
    h.clock.advance(1);
    h.engine.dispute_edge(late, BOB).unwrap();
    assert_eq!(h.balance(&CAROL), OPENING_BALANCE + bounty);
    let flag = &h.engine.flags(late)[0];
    assert!(flag.resolved);
    assert!(!flag.rewarded);
}

#[test]
fn test_maturity_reward_once() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let id = h.edge(a, b, EdgeType::Supports, 9_000, ALICE);
    let maturity = h.engine.config().edge_maturity_secs;

    assert!(matches!(
        h.engine.claim_edge_reward(id, ALICE),
        Err(TrellisError::EdgeNotMature { .. })
    ));
    h.clock.advance(maturity);
    let reward = h.engine.claim_edge_reward(id, ALICE).unwrap();
    assert_eq!(reward, UNITS_PER_TRL);
    assert_eq!(
        h.engine.claim_edge_reward(id, ALICE),
        Err(TrellisError::RewardAlreadyClaimed(id))
    );
}

#[test]
fn test_failed_call_leaves_no_trace() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let events_before = h.engine.events().len();
    let min = h.min_stake();

    // Ledger refuses the debit: nothing is staked or created.
    let err = h
        .engine
        .stake_and_create_edge(request(a, b, EdgeType::Depends, 9_000), min, BROKE)
        .unwrap_err();
    assert!(matches!(err, TrellisError::InsufficientBalance { .. }));
    assert_eq!(h.engine.next_edge_id(), 1);
    assert!(h.engine.stake_of(&BROKE, &StakeKey::for_edge(1)).is_none());
    assert_eq!(h.engine.events().len(), events_before);

    // Engine-side rejection after the stake step: the stake is undone too.
    let err = h
        .engine
        .stake_and_create_edge(request(a, a, EdgeType::Depends, 9_000), min, ALICE)
        .unwrap_err();
    assert_eq!(err, TrellisError::SelfReference(a));
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE);
    assert!(h.engine.stake_of(&ALICE, &StakeKey::for_edge(1)).is_none());
    assert_eq!(h.engine.events().len(), events_before);
}

#[test]
fn test_batch_is_all_or_nothing() {
    let mut h = Harness::new();
    let a = h.claim(5_000);
    let ghost = uuid::Uuid::now_v7();

    let err = h.engine.batch_propagate_scores(&[a, ghost], CAROL).unwrap_err();
    assert_eq!(err, TrellisError::ClaimNotFound(ghost));
    assert!(h.engine.propagated_score(&a).is_none());
    assert_eq!(h.balance(&CAROL), OPENING_BALANCE);
}

#[test]
fn test_admin_controls() {
    let mut h = Harness::new();

    assert!(matches!(
        h.engine.set_min_edge_stake(ALICE, 1),
        Err(TrellisError::NotAuthorized(_))
    ));
    h.engine.set_min_edge_stake(ADMIN, 5 * UNITS_PER_TRL).unwrap();
    assert_eq!(h.min_stake(), 5 * UNITS_PER_TRL);

    assert!(matches!(
        h.engine.set_propagation_params(ADMIN, 6_000, 6_000),
        Err(TrellisError::InvalidConfig(_))
    ));
    assert_eq!(h.engine.config().propagation_floor_bps, 3_000);

    assert!(h.engine.revoke_role(ADMIN, Role::Admin, ADMIN).is_err());
    assert!(h.engine.grant_role(ADMIN, Role::Admin, BOB).unwrap());
    assert!(h.engine.revoke_role(BOB, Role::Admin, ADMIN).unwrap());
    assert!(!h.engine.state().access().has_role(Role::Admin, &ADMIN));

    let names: Vec<&str> = h
        .engine
        .events()
        .events_since(0)
        .iter()
        .map(|e| e.event.name())
        .collect();
    assert_eq!(names, vec!["ConfigUpdated"]);
}

#[test]
fn test_vault_operator_surface() {
    let mut h = Harness::new();
    let key = StakeKey([9; 32]);
    h.engine.stake(key, 50 * UNITS_PER_TRL, ALICE).unwrap();

    assert!(matches!(
        h.engine.vault_lock(BOB, ALICE, key),
        Err(TrellisError::NotAuthorized(_))
    ));
    h.engine.grant_role(ADMIN, Role::VaultOperator, BOB).unwrap();
    h.engine.vault_lock(BOB, ALICE, key).unwrap();
    assert_eq!(h.engine.unstake(key, ALICE), Err(TrellisError::StakeLocked));

    let slash = h.engine.vault_slash(BOB, ALICE, key, 2_000).unwrap();
    assert_eq!(slash.slashed, 10 * UNITS_PER_TRL);
    h.engine.vault_transfer(BOB, ALICE, key, 15 * UNITS_PER_TRL, CAROL).unwrap();
    assert_eq!(h.balance(&CAROL), OPENING_BALANCE + 15 * UNITS_PER_TRL);

    assert_eq!(h.engine.vault_refund(BOB, ALICE, key).unwrap(), 25 * UNITS_PER_TRL);
    assert!(h.engine.stake_of(&ALICE, &key).is_none());
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE - 25 * UNITS_PER_TRL);
}

#[test]
fn test_removed_edge_refund_and_slot_reuse() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let id = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE - h.min_stake());

    assert_eq!(h.engine.remove_edge(id, BOB), Err(TrellisError::NotProposer(id)));
    h.engine.remove_edge(id, ALICE).unwrap();
    assert_eq!(h.balance(&ALICE), OPENING_BALANCE);

    let again = h.edge(a, b, EdgeType::Depends, 9_000, BOB);
    assert_eq!(again, id + 1);
    assert_eq!(h.engine.edges_depending_on(&b).len(), 2);
    h.clock.advance(DAY);
    assert!(h.engine.flag_weak_link(id, CAROL).is_err());
}

#[test]
fn test_config_setters_validate_on_write() {
    let mut h = Harness::new();
    let before = h.engine.config().clone();
    let invalid = |r: Result<(), TrellisError>| matches!(r, Err(TrellisError::InvalidConfig(_)));

    assert!(invalid(h.engine.set_max_cycle_search_depth(ADMIN, 0)));
    assert!(invalid(h.engine.set_intrinsic_weights(ADMIN, [1, 1, 1, 1])));
    assert!(invalid(h.engine.set_contradiction_params(ADMIN, 10_001, 4_000)));
    assert!(invalid(h.engine.set_contradiction_params(ADMIN, 1_500, 10_001)));
    assert!(invalid(h.engine.set_weak_link_window(ADMIN, 0)));
    assert!(invalid(h.engine.set_edge_maturity_period(ADMIN, 0)));
    assert!(invalid(h.engine.set_dispute_params(ADMIN, 0, 6_000)));
    assert!(invalid(h.engine.set_dispute_params(ADMIN, 1_000, 10_001)));
    assert!(matches!(
        h.engine.set_reward_schedule(ALICE, RewardSchedule::default()),
        Err(TrellisError::NotAuthorized(_))
    ));
    assert_eq!(h.engine.config(), &before);
    assert!(h.engine.events().is_empty());

    h.engine.set_max_cycle_search_depth(ADMIN, 5).unwrap();
    h.engine.set_intrinsic_weights(ADMIN, [2_500; 4]).unwrap();
    h.engine.set_contradiction_params(ADMIN, 2_000, 5_000).unwrap();
    h.engine.set_weak_link_window(ADMIN, DAY).unwrap();
    h.engine.set_edge_maturity_period(ADMIN, 2 * DAY).unwrap();
    h.engine.set_dispute_params(ADMIN, 2_000, 5_000).unwrap();
    let rewards = RewardSchedule {
        challenger_reward: 9 * UNITS_PER_TRL,
        ..RewardSchedule::default()
    };
    h.engine.set_reward_schedule(ADMIN, rewards).unwrap();

    let cfg = h.engine.config();
    assert_eq!(cfg.max_cycle_search_depth, 5);
    assert_eq!(cfg.intrinsic_weights.0, [2_500; 4]);
    assert_eq!((cfg.contradiction_penalty_bps, cfg.contradiction_floor_bps), (2_000, 5_000));
    assert_eq!(cfg.weak_link_window_secs, DAY);
    assert_eq!(cfg.edge_maturity_secs, 2 * DAY);
    assert_eq!((cfg.dispute_slash_bps, cfg.challenger_share_bps), (2_000, 5_000));
    assert_eq!(cfg.rewards, rewards);
    assert_eq!(h.engine.events().len(), 7);
}

#[test]
fn test_new_dispute_params_apply() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let id = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    h.engine.set_dispute_params(ADMIN, 2_000, 5_000).unwrap();
    h.engine
        .set_reward_schedule(
            ADMIN,
            RewardSchedule {
                challenger_reward: 9 * UNITS_PER_TRL,
                ..RewardSchedule::default()
            },
        )
        .unwrap();

    let outcome = h.engine.dispute_edge(id, BOB).unwrap();
    assert_eq!(outcome.slashed, 20 * UNITS_PER_TRL);
    assert_eq!(outcome.challenger_payout, 40 * UNITS_PER_TRL);
    assert_eq!(outcome.reward, 9 * UNITS_PER_TRL);
    assert_eq!(outcome.remaining_stake, 40 * UNITS_PER_TRL);
}

#[test]
fn test_weights_change_alters_propagated_score() {
    let mut h = Harness::new();
    let claim = h.registry.register(IntrinsicScores([10_000, 0, 0, 0])).unwrap();

    // Default weights put 30% on the first sub-score.
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 3_000);

    h.engine.set_intrinsic_weights(ADMIN, [10_000, 0, 0, 0]).unwrap();
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 10_000);

    h.engine.set_intrinsic_weights(ADMIN, [0, 0, 0, 10_000]).unwrap();
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 0);
}

#[test]
fn test_contradiction_params_alter_propagated_score() {
    let mut h = Harness::new();
    let (other, claim) = (h.claim(5_000), h.claim(8_200));
    h.edge(other, claim, EdgeType::Contradicts, 9_000, ALICE);
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 6_970);

    h.engine.set_contradiction_params(ADMIN, 3_000, 4_000).unwrap();
    // 8200 * 7000 / 10000
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 5_740);

    h.engine.set_contradiction_params(ADMIN, 9_000, 8_000).unwrap();
    assert_eq!(h.engine.propagate_score(claim, BOB).unwrap().chain_score, 6_560);
}

#[test]
fn test_diamond_shortcut_is_accepted() {
    let mut h = Harness::new();
    let (a, b, c, d) = (h.claim(5_000), h.claim(5_000), h.claim(5_000), h.claim(5_000));
    h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    h.edge(a, c, EdgeType::Depends, 9_000, ALICE);
    h.edge(b, d, EdgeType::Depends, 9_000, BOB);
    h.edge(c, d, EdgeType::Depends, 9_000, BOB);

    let shortcut = h.edge(a, d, EdgeType::Depends, 9_000, CAROL);
    assert_eq!(h.engine.edges_depending_on(&d).len(), 3);
    assert_eq!(h.engine.edge(shortcut).unwrap().status, EdgeStatus::Active);

    let min = h.min_stake();
    assert_eq!(
        h.engine
            .stake_and_create_edge(request(d, a, EdgeType::Depends, 9_000), min, CAROL)
            .unwrap_err(),
        TrellisError::CycleDetected
    );
}

#[test]
fn test_cycle_search_depth_is_a_bound() {
    let mut h = Harness::new();
    let claims: Vec<ClaimId> = (0..5).map(|_| h.claim(5_000)).collect();
    for pair in claims.windows(2) {
        h.edge(pair[0], pair[1], EdgeType::Depends, 9_000, ALICE);
    }
    let min = h.min_stake();
    let closing = request(claims[4], claims[0], EdgeType::Depends, 9_000);

    // The loop back is four hops long: found within the default bound.
    assert_eq!(
        h.engine.stake_and_create_edge(closing, min, BOB).unwrap_err(),
        TrellisError::CycleDetected
    );

    // Past a bound of three hops the search assumes no cycle.
    h.engine.set_max_cycle_search_depth(ADMIN, 3).unwrap();
    let id = h.engine.stake_and_create_edge(closing, min, BOB).unwrap();
    assert_eq!(h.engine.edge(id).unwrap().status, EdgeStatus::Active);
}

#[test]
fn test_edge_stake_follows_dispute_and_removal() {
    let mut h = Harness::new();
    let (a, b, c) = (h.claim(5_000), h.claim(5_000), h.claim(5_000));
    let disputed = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    let removed = h.edge(b, c, EdgeType::Supports, 9_000, ALICE);

    h.engine.dispute_edge(disputed, BOB).unwrap();
    assert_eq!(h.engine.edge(disputed).unwrap().stake, 36 * UNITS_PER_TRL);

    h.engine.remove_edge(removed, ALICE).unwrap();
    assert_eq!(h.engine.edge(removed).unwrap().stake, 0);
}

#[test]
fn test_operator_cannot_release_active_edge_stake() {
    let mut h = Harness::new();
    let (a, b) = (h.claim(5_000), h.claim(5_000));
    let id = h.edge(a, b, EdgeType::Depends, 9_000, ALICE);
    let key = StakeKey::for_edge(id);
    h.engine.grant_role(ADMIN, Role::VaultOperator, BOB).unwrap();

    assert_eq!(h.engine.vault_unlock(BOB, ALICE, key), Err(TrellisError::StakeInUse(id)));
    assert_eq!(h.engine.vault_slash(BOB, ALICE, key, 1_000), Err(TrellisError::StakeInUse(id)));
    assert_eq!(
        h.engine.vault_transfer(BOB, ALICE, key, UNITS_PER_TRL, CAROL),
        Err(TrellisError::StakeInUse(id))
    );
    assert_eq!(h.engine.vault_refund(BOB, ALICE, key), Err(TrellisError::StakeInUse(id)));
    assert_eq!(h.engine.stake_of(&ALICE, &key).unwrap().amount, h.min_stake());

    // The edge can still be disputed with its full stake behind it.
    let outcome = h.engine.dispute_edge(id, CAROL).unwrap();
    assert_eq!(outcome.slashed, 10 * UNITS_PER_TRL);

    // Once it is no longer Active, the operator may settle what is left.
    assert_eq!(h.engine.vault_refund(BOB, ALICE, key).unwrap(), 36 * UNITS_PER_TRL);
    assert_eq!(h.engine.edge(id).unwrap().stake, 0);
}
