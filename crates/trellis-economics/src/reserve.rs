// crates/trellis-economics/src/reserve.rs
//
// The slash reserve: collateral removed from stake records by slashing.
//
// Slashed stake is held by the vault rather than paid anywhere
// automatically. An administrator may later sweep it out to an external
// balance.

use serde::{Deserialize, Serialize};

use trellis_core::TrellisError;

/// Balance of slashed collateral held by the vault, in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashReserve {
    balance: u64,
}

impl SlashReserve {
    pub fn new() -> Self {
        Self { balance: 0 }
    }

    pub fn deposit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// # Errors
    /// Returns `TrellisError::InsufficientBalance` if the reserve holds less
    /// than `amount`; the balance is unchanged.
    pub fn withdraw(&mut self, amount: u64) -> Result<(), TrellisError> {
        if amount > self.balance {
            return Err(TrellisError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Reset the balance to a previously observed value.
    pub fn restore(&mut self, balance: u64) {
        self.balance = balance;
    }
}
