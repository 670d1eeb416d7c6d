// crates/trellis-graph/src/effects.rs
//
// Per-call transaction context.
//
// Operations never touch the token ledger or the event log directly. They
// record ledger movements and events here, and the engine applies them only
// once the operation has succeeded against the state. If the call cannot be
// persisted afterwards, the applied movements are reverted.

use tracing::error;

use trellis_core::{GraphEvent, Principal, Timestamp, TokenLedger, TrellisError};

/// A pending movement on the external token ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    Debit { who: Principal, amount: u64 },
    Credit { who: Principal, amount: u64 },
}

impl LedgerEffect {
    fn apply(&self, ledger: &mut dyn TokenLedger) -> Result<(), TrellisError> {
        match *self {
            LedgerEffect::Debit { who, amount } => ledger.debit(&who, amount),
            LedgerEffect::Credit { who, amount } => ledger.credit(&who, amount),
        }
    }

    fn inverse(&self) -> Self {
        match *self {
            LedgerEffect::Debit { who, amount } => LedgerEffect::Credit { who, amount },
            LedgerEffect::Credit { who, amount } => LedgerEffect::Debit { who, amount },
        }
    }

    fn is_debit(&self) -> bool {
        matches!(self, LedgerEffect::Debit { .. })
    }
}

/// Everything one call wants to do outside the state aggregate.
#[derive(Debug)]
pub struct TxContext {
    /// The call's single reading of the clock.
    pub now: Timestamp,
    effects: Vec<LedgerEffect>,
    events: Vec<GraphEvent>,
}

impl TxContext {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now,
            effects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn debit(&mut self, who: Principal, amount: u64) {
        if amount > 0 {
            self.effects.push(LedgerEffect::Debit { who, amount });
        }
    }

    pub fn credit(&mut self, who: Principal, amount: u64) {
        if amount > 0 {
            self.effects.push(LedgerEffect::Credit { who, amount });
        }
    }

    pub fn emit(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    pub fn effects(&self) -> &[LedgerEffect] {
        &self.effects
    }

    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    /// Debits first, then credits.
    fn ordered(&self) -> impl DoubleEndedIterator<Item = &LedgerEffect> {
        self.effects
            .iter()
            .filter(|e| e.is_debit())
            .chain(self.effects.iter().filter(|e| !e.is_debit()))
    }

    /// Apply all debits, then all credits. If any movement fails, every
    /// movement already applied is reversed and the error is returned.
    pub fn apply_effects(&self, ledger: &mut dyn TokenLedger) -> Result<(), TrellisError> {
        let mut applied: Vec<LedgerEffect> = Vec::with_capacity(self.effects.len());
        for effect in self.ordered() {
            if let Err(e) = effect.apply(ledger) {
                compensate(ledger, applied.iter().rev());
                return Err(e);
            }
            applied.push(*effect);
        }
        Ok(())
    }

    /// Undo a successful `apply_effects`, newest movement first.
    pub fn revert_effects(&self, ledger: &mut dyn TokenLedger) {
        compensate(ledger, self.ordered().rev());
    }
}

fn compensate<'a>(ledger: &mut dyn TokenLedger, done: impl Iterator<Item = &'a LedgerEffect>) {
    for effect in done {
        if let Err(undo) = effect.inverse().apply(ledger) {
            error!("Ledger compensation failed for {:?}: {}", effect, undo);
        }
    }
}
