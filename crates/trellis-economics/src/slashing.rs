// crates/trellis-economics/src/slashing.rs
//
// Slash and dispute-payout arithmetic.
//
// A successful dispute first slashes the proposer's edge stake by a
// percentage (default 10%). The slashed portion stays in the vault's slash
// reserve. The challenger is then paid a share (default 60%) of what remains
// after the slash, taken directly from the proposer's record.

use serde::{Deserialize, Serialize};

use trellis_core::bps::{mul_bps, BPS_DENOMINATOR};
use trellis_core::TrellisError;

/// Default dispute slash: 10% of the edge stake.
pub const DEFAULT_DISPUTE_SLASH_BPS: u64 = 1_000;

/// Default challenger share: 60% of the post-slash remainder.
pub const DEFAULT_CHALLENGER_SHARE_BPS: u64 = 6_000;

/// Outcome of slashing a single stake record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResult {
    /// Amount moved into the slash reserve.
    pub slashed: u64,
    /// Amount left on the record.
    pub remaining: u64,
}

/// Penalty for slashing `stake` by `bps`, floored.
///
/// # Errors
/// `InvalidBasisPoints` unless 0 < bps <= 10_000.
pub fn compute_penalty(stake: u64, bps: u64) -> Result<u64, TrellisError> {
    if bps == 0 || bps > BPS_DENOMINATOR {
        return Err(TrellisError::InvalidBasisPoints(bps));
    }
    Ok(mul_bps(stake, bps))
}

/// Challenger payout out of the post-slash `remaining` stake, floored.
pub fn challenger_share(remaining: u64, share_bps: u64) -> u64 {
    mul_bps(remaining, share_bps.min(BPS_DENOMINATOR))
}
