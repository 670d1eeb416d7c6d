// crates/trellis-economics/src/lib.rs
//
// trellis-economics: $TRL units, the stake vault, slashing arithmetic,
// fixed reward schedule, and slash reserve for the Trellis claim graph.
//
// All monetary values are tracked in base units.
// 1 TRL = 1,000,000,000 units (10^9).

pub mod ledger;
pub mod reserve;
pub mod rewards;
pub mod slashing;
pub mod token;
pub mod vault;

// Re-export key types for ergonomic access from downstream crates.
pub use ledger::InMemoryLedger;
pub use reserve::SlashReserve;
pub use rewards::{RewardKind, RewardSchedule};
pub use slashing::{challenger_share, compute_penalty, SlashResult};
pub use token::{Trl, UNITS_PER_TRL};
pub use vault::{StakeRecord, StakeVault};
