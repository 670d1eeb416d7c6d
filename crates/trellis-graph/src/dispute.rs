// crates/trellis-graph/src/dispute.rs
//
// DisputeResolution: a challenger contests an Active edge.
//
// The edge moves to Disputed (keeping its dedup slot), the proposer's stake
// is slashed into the vault reserve, the challenger receives a share of the
// post-slash remainder straight out of the proposer's record plus a fixed
// reward, and pending weak-link flags on the edge are vindicated.
// Disputed edges never return to Active.

use serde::{Deserialize, Serialize};
use tracing::info;

use trellis_core::{EdgeId, EdgeStatus, GraphEvent, Principal, TrellisError};
use trellis_economics::{challenger_share, RewardKind, Trl};

use crate::effects::TxContext;
use crate::journal::Entity;
use crate::state::EngineState;

/// Value movements caused by one dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeOutcome {
    /// Moved from the proposer's record into the slash reserve.
    pub slashed: u64,
    /// Moved from the proposer's record to the challenger.
    pub challenger_payout: u64,
    /// Fixed challenger reward.
    pub reward: u64,
    /// Left on the proposer's (still locked) record.
    pub remaining_stake: u64,
}

impl EngineState {
    pub(crate) fn dispute_edge(
        &mut self,
        tx: &mut TxContext,
        id: EdgeId,
        challenger: Principal,
    ) -> Result<DisputeOutcome, TrellisError> {
        let edge = self.edge_or_err(id)?;
        if edge.status != EdgeStatus::Active {
            return Err(TrellisError::InvalidStatusForTransition {
                id,
                status: edge.status,
            });
        }
        if edge.proposer == challenger {
            return Err(TrellisError::SelfDispute(id));
        }
        let proposer = edge.proposer;
        let key = edge.stake_key();

        self.transition(id, EdgeStatus::Disputed)?;

        self.touch(Entity::Stake(proposer, key));
        self.touch(Entity::Reserve);
        let slash = self.vault.slash(&proposer, &key, self.config.dispute_slash_bps)?;
        let payout = challenger_share(slash.remaining, self.config.challenger_share_bps);
        self.vault.transfer_out(&proposer, &key, payout)?;
        self.sync_edge_stake(&key);
        let reward = self.config.rewards.amount_for(RewardKind::Challenger);
        tx.credit(challenger, payout);
        tx.credit(challenger, reward);

        self.resolve_flags(tx, id);

        let outcome = DisputeOutcome {
            slashed: slash.slashed,
            challenger_payout: payout,
            reward,
            remaining_stake: slash.remaining - payout,
        };
        info!(
            "Edge {} disputed by {}: slashed {}, challenger paid {} + reward {}",
            id,
            challenger,
            Trl::from_units(outcome.slashed),
            Trl::from_units(payout),
            Trl::from_units(reward)
        );
        tx.emit(GraphEvent::EdgeDisputed {
            edge_id: id,
            challenger,
            slashed: outcome.slashed,
            challenger_payout: payout,
        });
        Ok(outcome)
    }
}
