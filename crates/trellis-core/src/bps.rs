// crates/trellis-core/src/bps.rs
//
// Basis-point arithmetic. Scores, confidences, weights and percentages are
// all integers over a denominator of 10,000 (10,000 = 1.0). Products are
// widened to u128 so `amount * bps` never overflows for any u64 amount.

/// The basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Compute `value * bps / 10_000` with floor division.
///
/// The result never exceeds `value` when `bps <= 10_000`.
pub fn mul_bps(value: u64, bps: u64) -> u64 {
    ((value as u128 * bps as u128) / BPS_DENOMINATOR as u128) as u64
}

/// Returns true if `bps` lies in the closed range [0, 10_000].
pub fn is_valid_bps(bps: u64) -> bool {
    bps <= BPS_DENOMINATOR
}
