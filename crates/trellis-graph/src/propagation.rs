// crates/trellis-graph/src/propagation.rs
//
// ScorePropagation: recompute a claim's chain score from its intrinsic score
// and the last stored chain scores of its Active dependencies.
//
//   intrinsic  = sum(sub_score[i] * weight[i]) / 10000
//   effective  = min(dependency chain score, edge confidence)     per Depends edge
//   weakest    = min(effective)
//   chain      = intrinsic                                          if no Depends edges
//              = intrinsic * (floor + damping * weakest / 10000) / 10000   otherwise
//   multiplier = max(contradiction_floor, 10000 - contradictions * penalty)
//   chain      = chain * multiplier / 10000
//
// Dependencies are never recomputed recursively. A dependency that has never
// been propagated contributes a chain score of 0 and a depth of 0. Callers
// propagate in dependency order (axioms first) to get consistent results.

use tracing::{debug, info};

use trellis_core::bps::{mul_bps, BPS_DENOMINATOR};
use trellis_core::{
    ClaimId, EdgeId, EdgeType, GraphEvent, IntrinsicScores, Principal, PropagatedScore, Registry, TrellisError,
};
use trellis_economics::RewardKind;

use crate::effects::TxContext;
use crate::journal::Entity;
use crate::state::EngineState;

impl EngineState {
    /// Compute (without storing) the score `claim` would get right now.
    pub fn compute_score(&self, claim: &ClaimId, intrinsic: u64, now: u64) -> PropagatedScore {
        let cfg = &self.config;

        let mut weakest: Option<(u64, EdgeId)> = None;
        let mut deepest_dependency = 0u32;
        for edge in self.active_incoming(claim, EdgeType::Depends) {
            let dependency = self.scores.get(&edge.source);
            let dependency_score = dependency.map(|s| s.chain_score).unwrap_or(0);
            let effective = dependency_score.min(u64::from(edge.confidence));
            debug!(
                "Claim {} edge {}: dependency score {}, confidence {}, effective {}",
                claim, edge.id, dependency_score, edge.confidence, effective
            );
            if weakest.map_or(true, |(w, _)| effective < w) {
                weakest = Some((effective, edge.id));
            }
            deepest_dependency = deepest_dependency.max(dependency.map(|s| s.depth).unwrap_or(0));
        }

        let (attenuated, weakest_link_score, weakest_link_edge, depth) = match weakest {
            None => (intrinsic, 0, None, 0),
            Some((weakest_score, edge_id)) => {
                let factor = cfg.propagation_floor_bps + mul_bps(cfg.propagation_damping_bps, weakest_score);
                (
                    mul_bps(intrinsic, factor),
                    weakest_score,
                    Some(edge_id),
                    deepest_dependency.saturating_add(1),
                )
            }
        };

        let contradictions = self.active_incoming(claim, EdgeType::Contradicts).count() as u64;
        let multiplier = BPS_DENOMINATOR
            .saturating_sub(contradictions.saturating_mul(cfg.contradiction_penalty_bps))
            .max(cfg.contradiction_floor_bps);
        let chain_score = mul_bps(attenuated, multiplier);
        debug!(
            "Claim {}: intrinsic {}, attenuated {}, {} contradictions -> multiplier {}",
            claim, intrinsic, attenuated, contradictions, multiplier
        );

        PropagatedScore {
            chain_score,
            weakest_link_score,
            weakest_link_edge,
            depth,
            updated_at: now,
        }
    }

    /// Recompute and store `claim`'s score, paying the caller the
    /// propagation incentive.
    pub(crate) fn propagate_score(
        &mut self,
        tx: &mut TxContext,
        registry: &dyn Registry,
        claim: ClaimId,
        caller: Principal,
    ) -> Result<PropagatedScore, TrellisError> {
        if !registry.claim_exists(&claim) {
            return Err(TrellisError::ClaimNotFound(claim));
        }
        // The registry is outside the engine; re-check its range.
        let sub_scores = IntrinsicScores::new(registry.intrinsic_sub_scores(&claim)?.0)?;
        let intrinsic = sub_scores.weighted(&self.config.intrinsic_weights);
        let score = self.compute_score(&claim, intrinsic, tx.now);
        self.touch(Entity::Score(claim));
        self.scores.insert(claim, score);

        tx.credit(caller, self.config.rewards.amount_for(RewardKind::Propagation));
        info!(
            "Score propagated for {}: chain {}, weakest {:?}, depth {}",
            claim, score.chain_score, score.weakest_link_edge, score.depth
        );
        tx.emit(GraphEvent::ScorePropagated {
            claim_id: claim,
            chain_score: score.chain_score,
            weakest_link_edge: score.weakest_link_edge,
            depth: score.depth,
        });
        Ok(score)
    }

    /// Propagate each claim in the order given.
    pub(crate) fn batch_propagate_scores(
        &mut self,
        tx: &mut TxContext,
        registry: &dyn Registry,
        claims: &[ClaimId],
        caller: Principal,
    ) -> Result<Vec<PropagatedScore>, TrellisError> {
        claims
            .iter()
            .map(|claim| self.propagate_score(tx, registry, *claim, caller))
            .collect()
    }
}
