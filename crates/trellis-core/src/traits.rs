// crates/trellis-core/src/traits.rs

use crate::claim::{ClaimId, IntrinsicScores};
use crate::clock::Timestamp;
use crate::error::TrellisError;
use crate::event::SequencedEvent;
use crate::identity::Principal;

/// Read access to the external claim registry.
pub trait Registry: Send + Sync {
    fn claim_exists(&self, claim: &ClaimId) -> bool;

    /// The claim's four intrinsic sub-scores.
    fn intrinsic_sub_scores(&self, claim: &ClaimId) -> Result<IntrinsicScores, TrellisError>;
}

/// Debit/credit primitives of the external token ledger.
///
/// Implemented by trellis-economics (`InMemoryLedger`) for tests and
/// embedding; a host ledger supplies its own.
pub trait TokenLedger: Send {
    fn balance_of(&self, who: &Principal) -> u64;

    /// Remove `amount` from `who`. Fails without effect if the balance is short.
    fn debit(&mut self, who: &Principal, amount: u64) -> Result<(), TrellisError>;

    /// Add `amount` to `who`.
    fn credit(&mut self, who: &Principal, amount: u64) -> Result<(), TrellisError>;
}

/// One atomic write to a state store: entity upserts, entity deletes, and
/// the events committed alongside them.
///
/// Keys are namespaced strings chosen by the engine (`edge:...`,
/// `score:...`); values are opaque bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateBatch {
    pub puts: Vec<(String, Vec<u8>)>,
    pub deletes: Vec<String>,
    pub events: Vec<SequencedEvent>,
}

impl StateBatch {
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty() && self.events.is_empty()
    }
}

/// Pluggable persistence for the engine's entities and event log.
///
/// Implemented by trellis-store (in-memory and RocksDB backends).
pub trait StateStore: Send {
    /// Every stored entity entry, excluding events.
    fn load_entries(&self) -> Result<Vec<(String, Vec<u8>)>, TrellisError>;

    /// Apply `batch` atomically: all of it or none of it.
    fn commit(&mut self, batch: StateBatch) -> Result<(), TrellisError>;
}

/// Source of the current time for maturity and reward-window checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
