// crates/trellis-graph/src/lib.rs
//
// trellis-graph: The Trellis engine.
//
// Untrusted principals assert staked, typed edges between independently
// scored claims, dispute them, and flag weak ones. A claim's trust score is
// propagated from its dependencies' last stored scores, attenuated by the
// weakest dependency and penalized per contradiction.
//
// Every public operation on `Engine` is all-or-nothing: it either commits
// its state changes, ledger movements and events together, or has no
// effect at all.

pub mod access;
pub mod bounty;
mod checkpoint;
pub mod config;
pub mod dispute;
pub mod effects;
pub mod engine;
pub mod events;
pub mod graph;
mod journal;
pub mod lifecycle;
pub mod propagation;
pub mod staking;
pub mod state;

// Re-export key types for ergonomic access from downstream crates.
pub use access::{AccessControl, Role};
pub use config::EngineConfig;
pub use dispute::DisputeOutcome;
pub use engine::{Collaborators, Engine};
pub use events::EventLog;
pub use lifecycle::NewEdge;
pub use state::EngineState;

#[cfg(test)]
mod test_support;
