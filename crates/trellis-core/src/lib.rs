// crates/trellis-core/src/lib.rs
//
// trellis-core: Core types, traits, and errors for the Trellis claim graph.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the edge and score data model, domain events, the error type,
// basis-point arithmetic, and the collaborator traits (registry, token
// ledger, state store, clock) the engine is wired against.

pub mod bps;
pub mod claim;
pub mod clock;
pub mod edge;
pub mod error;
pub mod event;
pub mod identity;
pub mod score;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use trellis_core::Edge;`

pub use bps::{mul_bps, BPS_DENOMINATOR};
pub use claim::{ClaimId, IntrinsicScores, SubScoreWeights};
pub use clock::{ManualClock, SystemClock, Timestamp};
pub use edge::{Edge, EdgeId, EdgeStatus, EdgeType, EvidenceRef, StakeKey};
pub use error::TrellisError;
pub use event::{GraphEvent, SequencedEvent};
pub use identity::Principal;
pub use score::{PropagatedScore, WeakLinkFlag};
pub use traits::{Clock, Registry, StateBatch, StateStore, TokenLedger};
