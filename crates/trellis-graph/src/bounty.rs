// crates/trellis-graph/src/bounty.rs
//
// WeakLinkBounty and the edge maturity reward.
//
// Anyone may flag an Active edge as weak, at no cost. When that edge is
// later disputed or invalidated, every unresolved flag on it is resolved;
// flags raised within the reward window of that moment (inclusive) earn the
// flagger a fixed bounty. Flags on edges that are never disputed or
// invalidated stay unresolved.
//
// Separately, a proposer whose edge has stayed Active for the maturity
// period can claim a one-time reward.

use tracing::info;

use trellis_core::{EdgeId, EdgeStatus, GraphEvent, Principal, TrellisError, WeakLinkFlag};
use trellis_economics::{RewardKind, Trl};

use crate::effects::TxContext;
use crate::journal::Entity;
use crate::state::EngineState;

impl EngineState {
    pub(crate) fn flag_weak_link(&mut self, tx: &mut TxContext, id: EdgeId, flagger: Principal) -> Result<(), TrellisError> {
        let edge = self.edge_or_err(id)?;
        if edge.status != EdgeStatus::Active {
            return Err(TrellisError::InvalidStatusForTransition {
                id,
                status: edge.status,
            });
        }
        self.touch(Entity::Flags(id));
        let flags = self.flags.entry(id).or_default();
        if flags.iter().any(|f| f.flagger == flagger && !f.resolved) {
            return Err(TrellisError::AlreadyFlagged(id));
        }
        flags.push(WeakLinkFlag::new(flagger, tx.now));

        info!("Edge {} flagged as weak by {}", id, flagger);
        tx.emit(GraphEvent::WeakLinkFlagged { edge_id: id, flagger });
        Ok(())
    }

    /// Resolve every pending flag on `id` as vindicated, paying bounties to
    /// those inside the reward window. Returns the number of rewarded flags.
    pub(crate) fn resolve_flags(&mut self, tx: &mut TxContext, id: EdgeId) -> usize {
        let window = self.config.weak_link_window_secs;
        let bounty = self.config.rewards.amount_for(RewardKind::WeakLinkBounty);
        if !self.flags.contains_key(&id) {
            return 0;
        }
        self.touch(Entity::Flags(id));
        let Some(flags) = self.flags.get_mut(&id) else {
            return 0;
        };

        let mut rewarded = 0;
        for flag in flags.iter_mut().filter(|f| !f.resolved) {
            flag.resolved = true;
            if tx.now.saturating_sub(flag.flagged_at) <= window {
                flag.rewarded = true;
                rewarded += 1;
                tx.credit(flag.flagger, bounty);
                info!(
                    "Weak-link flag on edge {} by {} vindicated, bounty {}",
                    id,
                    flag.flagger,
                    Trl::from_units(bounty)
                );
                tx.emit(GraphEvent::WeakLinkRewarded {
                    edge_id: id,
                    flagger: flag.flagger,
                    bounty,
                });
            }
        }
        rewarded
    }

    pub(crate) fn claim_edge_reward(&mut self, tx: &mut TxContext, id: EdgeId, caller: Principal) -> Result<u64, TrellisError> {
        let maturity = self.config.edge_maturity_secs;
        let reward = self.config.rewards.amount_for(RewardKind::EdgeMaturity);
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
        if edge.reward_claimed {
            return Err(TrellisError::RewardAlreadyClaimed(id));
        }
        let matures_at = edge.created_at.saturating_add(maturity);
        if tx.now < matures_at {
            return Err(TrellisError::EdgeNotMature { id, matures_at });
        }
        self.edge_mut(id)?.reward_claimed = true;
        tx.credit(caller, reward);

        info!("Maturity reward {} claimed for edge {}", Trl::from_units(reward), id);
        tx.emit(GraphEvent::EdgeRewardClaimed {
            edge_id: id,
            proposer: caller,
            reward,
        });
        Ok(reward)
    }
}
