// crates/trellis-economics/src/vault.rs
//
// Stake custody keyed by (owner, purpose-key).
//
// The vault is pure bookkeeping. Movements across the vault boundary
// (deposit from, or payout to, an external balance) are reported back to
// the caller as amounts; the engine turns them into token-ledger debits and
// credits once the whole call has succeeded.
//
// Public operations:     deposit, withdraw
// Privileged operations: lock, unlock, slash, transfer_out, refund
// (privilege is enforced by the engine, which owns the vault.)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use trellis_core::{Principal, StakeKey, TrellisError};

use crate::reserve::SlashReserve;
use crate::slashing::{compute_penalty, SlashResult};

/// Collateral held for one (owner, purpose-key).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Amount in base units.
    pub amount: u64,
    /// Locked records cannot be withdrawn by their owner.
    pub locked: bool,
}

/// Custodies all staked collateral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeVault {
    records: HashMap<(Principal, StakeKey), StakeRecord>,
    reserve: SlashReserve,
}

impl StakeVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the owner's record under `key`, creating it if needed.
    ///
    /// Returns the new record amount. The caller is responsible for debiting
    /// the owner's external balance by `amount`.
    ///
    /// # Errors
    /// `InvalidAmount` if `amount` is zero or the record would overflow.
    pub fn deposit(&mut self, owner: Principal, key: StakeKey, amount: u64) -> Result<u64, TrellisError> {
        if amount == 0 {
            return Err(TrellisError::InvalidAmount("stake amount must be positive".to_string()));
        }
        let record = self.records.entry((owner, key)).or_default();
        record.amount = record
            .amount
            .checked_add(amount)
            .ok_or_else(|| TrellisError::InvalidAmount("stake record overflow".to_string()))?;
        Ok(record.amount)
    }

    /// Owner-initiated full withdrawal of an unlocked record.
    ///
    /// Zeroes the record and returns the amount to credit back to the owner.
    ///
    /// # Errors
    /// `NoStake` if there is nothing staked, `StakeLocked` if the record is locked.
    pub fn withdraw(&mut self, owner: &Principal, key: &StakeKey) -> Result<u64, TrellisError> {
        let record = self.record(owner, key)?;
        if record.locked {
            return Err(TrellisError::StakeLocked);
        }
        let amount = record.amount;
        self.records.remove(&(*owner, *key));
        Ok(amount)
    }

    pub fn lock(&mut self, owner: &Principal, key: &StakeKey) -> Result<(), TrellisError> {
        self.record_mut(owner, key)?.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self, owner: &Principal, key: &StakeKey) -> Result<(), TrellisError> {
        self.record_mut(owner, key)?.locked = false;
        Ok(())
    }

    /// Reduce the record by `amount * bps / 10_000`, moving the penalty into
    /// the slash reserve.
    ///
    /// # Errors
    /// `InvalidBasisPoints` unless 0 < bps <= 10_000; `NoStake` if no record exists.
    pub fn slash(&mut self, owner: &Principal, key: &StakeKey, bps: u64) -> Result<SlashResult, TrellisError> {
        let record = self.record_mut(owner, key)?;
        let slashed = compute_penalty(record.amount, bps)?;
        record.amount -= slashed;
        let remaining = record.amount;
        self.reserve.deposit(slashed);
        Ok(SlashResult { slashed, remaining })
    }

    /// Take `amount` out of the owner's record for payment to a third party.
    /// The record is not re-staked anywhere; the caller credits the recipient.
    ///
    /// # Errors
    /// `NoStake` if no record exists, `InsufficientStake` if it holds less than `amount`.
    pub fn transfer_out(&mut self, owner: &Principal, key: &StakeKey, amount: u64) -> Result<(), TrellisError> {
        let record = self.record_mut(owner, key)?;
        if record.amount < amount {
            return Err(TrellisError::InsufficientStake {
                required: amount,
                staked: record.amount,
            });
        }
        record.amount -= amount;
        Ok(())
    }

    /// Clean exit: clear the lock and release the full remaining amount.
    ///
    /// Returns the amount to credit back to the owner.
    pub fn refund(&mut self, owner: &Principal, key: &StakeKey) -> Result<u64, TrellisError> {
        let amount = self.record(owner, key)?.amount;
        self.records.remove(&(*owner, *key));
        Ok(amount)
    }

    /// Put a record back exactly as it was: `None` removes it. Used when
    /// rolling back a call and when loading records from storage.
    pub fn restore(&mut self, owner: Principal, key: StakeKey, record: Option<StakeRecord>) {
        match record {
            Some(record) => {
                self.records.insert((owner, key), record);
            }
            None => {
                self.records.remove(&(owner, key));
            }
        }
    }

    /// Every record, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = (Principal, StakeKey, &StakeRecord)> {
        self.records.iter().map(|((owner, key), record)| (*owner, *key, record))
    }

    pub fn get(&self, owner: &Principal, key: &StakeKey) -> Option<&StakeRecord> {
        self.records.get(&(*owner, *key))
    }

    /// Amount staked under (owner, key); zero if no record.
    pub fn amount_of(&self, owner: &Principal, key: &StakeKey) -> u64 {
        self.get(owner, key).map(|r| r.amount).unwrap_or(0)
    }

    /// Total collateral held on stake records (excludes the slash reserve).
    pub fn total_staked(&self) -> u64 {
        self.records.values().map(|r| r.amount).sum()
    }

    pub fn reserve(&self) -> &SlashReserve {
        &self.reserve
    }

    pub fn reserve_mut(&mut self) -> &mut SlashReserve {
        &mut self.reserve
    }

    fn record(&self, owner: &Principal, key: &StakeKey) -> Result<&StakeRecord, TrellisError> {
        self.records.get(&(*owner, *key)).ok_or(TrellisError::NoStake)
    }

    fn record_mut(&mut self, owner: &Principal, key: &StakeKey) -> Result<&mut StakeRecord, TrellisError> {
        self.records.get_mut(&(*owner, *key)).ok_or(TrellisError::NoStake)
    }
}
