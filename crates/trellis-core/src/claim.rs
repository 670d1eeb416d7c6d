// crates/trellis-core/src/claim.rs
//
// Claims are owned by the external registry. The graph only knows a claim by
// its identifier and reads its four intrinsic sub-scores when propagating.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bps::BPS_DENOMINATOR;
use crate::error::TrellisError;

/// Opaque identifier of a claim held by the registry.
pub type ClaimId = Uuid;

/// Upper bound of a single sub-score (inclusive).
pub const MAX_SUB_SCORE: u16 = 10_000;

/// The four intrinsic sub-scores of a claim, each in [0, 10_000], in the
/// order the registry reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrinsicScores(pub [u16; 4]);

impl IntrinsicScores {
    /// Build sub-scores, rejecting any value above 10_000.
    pub fn new(scores: [u16; 4]) -> Result<Self, TrellisError> {
        if let Some(bad) = scores.iter().find(|s| **s > MAX_SUB_SCORE) {
            return Err(TrellisError::SubScoreOutOfRange((*bad).into()));
        }
        Ok(Self(scores))
    }

    /// Weighted sum of the sub-scores divided by 10_000.
    pub fn weighted(&self, weights: &SubScoreWeights) -> u64 {
        let sum: u128 = self
            .0
            .iter()
            .zip(weights.0.iter())
            .map(|(s, w)| *s as u128 * *w as u128)
            .sum();
        (sum / BPS_DENOMINATOR as u128) as u64
    }
}

/// Weights applied to the four sub-scores. Must sum to exactly 10_000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScoreWeights(pub [u64; 4]);

impl SubScoreWeights {
    /// Validate and wrap a weight vector.
    pub fn new(weights: [u64; 4]) -> Result<Self, TrellisError> {
        let w = Self(weights);
        w.validate()?;
        Ok(w)
    }

    pub fn validate(&self) -> Result<(), TrellisError> {
        let total: u64 = self.0.iter().sum();
        if total != BPS_DENOMINATOR {
            return Err(TrellisError::InvalidConfig(format!(
                "intrinsic weights must sum to {}, got {}",
                BPS_DENOMINATOR, total
            )));
        }
        Ok(())
    }
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self([3_000, 2_500, 2_500, 2_000])
    }
}
