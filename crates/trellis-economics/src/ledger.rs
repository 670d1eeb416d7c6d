// crates/trellis-economics/src/ledger.rs
//
// In-memory token ledger. Stands in for the host ledger when Trellis is
// embedded without one, and in tests.

use std::collections::HashMap;

use trellis_core::{Principal, TokenLedger, TrellisError};

/// Fungible balances keyed by principal, in base units.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Principal, u64>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger with opening balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (Principal, u64)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
        }
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u64 {
        self.balances.values().copied().sum()
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, who: &Principal) -> u64 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    fn debit(&mut self, who: &Principal, amount: u64) -> Result<(), TrellisError> {
        let available = self.balance_of(who);
        if amount > available {
            return Err(TrellisError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert(*who, available - amount);
        Ok(())
    }

    fn credit(&mut self, who: &Principal, amount: u64) -> Result<(), TrellisError> {
        let balance = self.balances.entry(*who).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| TrellisError::Ledger(format!("balance overflow for {}", who)))?;
        Ok(())
    }
}
