// crates/trellis-economics/src/rewards.rs
//
// Fixed reward amounts paid by the engine:
//   - propagation incentive: to whoever triggers a score recomputation
//   - challenger reward: to the challenger of a successful dispute, on top
//     of their share of the slashed edge stake
//   - weak-link bounty: to each flagger vindicated within the reward window
//   - edge maturity reward: once per edge, to a proposer whose edge stayed
//     Active through the maturity period
//
// Rewards are credited through the token-ledger collaborator; issuance
// policy belongs to the host ledger.

use serde::{Deserialize, Serialize};

use crate::token::UNITS_PER_TRL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    Propagation,
    Challenger,
    WeakLinkBounty,
    EdgeMaturity,
}

/// The four fixed reward amounts, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    #[serde(default = "default_propagation_incentive")]
    pub propagation_incentive: u64,
    #[serde(default = "default_challenger_reward")]
    pub challenger_reward: u64,
    #[serde(default = "default_weak_link_bounty")]
    pub weak_link_bounty: u64,
    #[serde(default = "default_edge_maturity_reward")]
    pub edge_maturity_reward: u64,
}

fn default_propagation_incentive() -> u64 {
    UNITS_PER_TRL / 10
}

fn default_challenger_reward() -> u64 {
    5 * UNITS_PER_TRL
}

fn default_weak_link_bounty() -> u64 {
    2 * UNITS_PER_TRL
}

fn default_edge_maturity_reward() -> u64 {
    UNITS_PER_TRL
}

impl RewardSchedule {
    pub fn amount_for(&self, kind: RewardKind) -> u64 {
        match kind {
            RewardKind::Propagation => self.propagation_incentive,
            RewardKind::Challenger => self.challenger_reward,
            RewardKind::WeakLinkBounty => self.weak_link_bounty,
            RewardKind::EdgeMaturity => self.edge_maturity_reward,
        }
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            propagation_incentive: default_propagation_incentive(),
            challenger_reward: default_challenger_reward(),
            weak_link_bounty: default_weak_link_bounty(),
            edge_maturity_reward: default_edge_maturity_reward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_for_each_kind() {
        let s = RewardSchedule {
            propagation_incentive: 1,
            challenger_reward: 2,
            weak_link_bounty: 3,
            edge_maturity_reward: 4,
        };
        assert_eq!(s.amount_for(RewardKind::Propagation), 1);
        assert_eq!(s.amount_for(RewardKind::Challenger), 2);
        assert_eq!(s.amount_for(RewardKind::WeakLinkBounty), 3);
        assert_eq!(s.amount_for(RewardKind::EdgeMaturity), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: RewardSchedule = serde_json::from_str(r#"{"challenger_reward": 7}"#).unwrap();
        assert_eq!(s.challenger_reward, 7);
        assert_eq!(s.weak_link_bounty, RewardSchedule::default().weak_link_bounty);
    }
}
