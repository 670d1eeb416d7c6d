// crates/trellis-graph/src/staking.rs
//
// StakeVault operations as seen from the engine: public deposit/withdraw,
// and the privileged lock/unlock/slash/transfer/refund surface for approved
// vault operators. Edge lifecycle and dispute resolution call the vault
// directly and do not pass through these checks.
//
// Operators may not unlock, slash, move or refund stake that backs an Active
// edge; that stake is only released by the edge's own lifecycle.

use tracing::info;

use trellis_core::{GraphEvent, Principal, StakeKey, TrellisError};
use trellis_economics::{SlashResult, Trl};

use crate::access::Role;
use crate::effects::TxContext;
use crate::journal::Entity;
use crate::state::EngineState;

impl EngineState {
    /// Keep `Edge.stake` equal to what the edge's proposer holds under its key.
    pub(crate) fn sync_edge_stake(&mut self, key: &StakeKey) {
        let Some((id, proposer, stake)) = self
            .backing
            .get(key)
            .and_then(|id| self.edges.get(id))
            .map(|edge| (edge.id, edge.proposer, edge.stake))
        else {
            return;
        };
        let amount = self.vault.amount_of(&proposer, key);
        if amount != stake {
            self.touch(Entity::Edge(id));
            if let Some(edge) = self.edges.get_mut(&id) {
                edge.stake = amount;
            }
        }
    }

    fn require_operator(&self, caller: &Principal, key: &StakeKey) -> Result<(), TrellisError> {
        self.access.require(Role::VaultOperator, caller)?;
        match self.active_edge_backed_by(key) {
            Some(id) => Err(TrellisError::StakeInUse(id)),
            None => Ok(()),
        }
    }

    pub(crate) fn stake(&mut self, tx: &mut TxContext, key: StakeKey, amount: u64, owner: Principal) -> Result<u64, TrellisError> {
        self.touch(Entity::Stake(owner, key));
        let total = self.vault.deposit(owner, key, amount)?;
        self.sync_edge_stake(&key);
        tx.debit(owner, amount);
        info!("{} staked {} under {}", owner, Trl::from_units(amount), key);
        tx.emit(GraphEvent::Staked { owner, key, amount });
        Ok(total)
    }

    pub(crate) fn unstake(&mut self, tx: &mut TxContext, key: StakeKey, owner: Principal) -> Result<u64, TrellisError> {
        self.touch(Entity::Stake(owner, key));
        let amount = self.vault.withdraw(&owner, &key)?;
        self.sync_edge_stake(&key);
        tx.credit(owner, amount);
        info!("{} unstaked {} from {}", owner, Trl::from_units(amount), key);
        tx.emit(GraphEvent::Unstaked { owner, key, amount });
        Ok(amount)
    }

    pub(crate) fn vault_lock(&mut self, caller: Principal, owner: Principal, key: StakeKey) -> Result<(), TrellisError> {
        self.access.require(Role::VaultOperator, &caller)?;
        self.touch(Entity::Stake(owner, key));
        self.vault.lock(&owner, &key)?;
        info!("Operator {} locked stake of {} under {}", caller, owner, key);
        Ok(())
    }

    pub(crate) fn vault_unlock(&mut self, caller: Principal, owner: Principal, key: StakeKey) -> Result<(), TrellisError> {
        self.require_operator(&caller, &key)?;
        self.touch(Entity::Stake(owner, key));
        self.vault.unlock(&owner, &key)?;
        info!("Operator {} unlocked stake of {} under {}", caller, owner, key);
        Ok(())
    }

    pub(crate) fn vault_slash(&mut self, caller: Principal, owner: Principal, key: StakeKey, bps: u64) -> Result<SlashResult, TrellisError> {
        self.require_operator(&caller, &key)?;
        self.touch(Entity::Stake(owner, key));
        self.touch(Entity::Reserve);
        let result = self.vault.slash(&owner, &key, bps)?;
        self.sync_edge_stake(&key);
        info!("Operator {} slashed {} from {}", caller, Trl::from_units(result.slashed), owner);
        Ok(result)
    }

    pub(crate) fn vault_transfer(
        &mut self,
        tx: &mut TxContext,
        caller: Principal,
        owner: Principal,
        key: StakeKey,
        amount: u64,
        recipient: Principal,
    ) -> Result<(), TrellisError> {
        self.require_operator(&caller, &key)?;
        self.touch(Entity::Stake(owner, key));
        self.vault.transfer_out(&owner, &key, amount)?;
        self.sync_edge_stake(&key);
        tx.credit(recipient, amount);
        info!(
            "Operator {} moved {} of {}'s stake under {} to {}",
            caller,
            Trl::from_units(amount),
            owner,
            key,
            recipient
        );
        Ok(())
    }

    pub(crate) fn vault_refund(&mut self, tx: &mut TxContext, caller: Principal, owner: Principal, key: StakeKey) -> Result<u64, TrellisError> {
        self.require_operator(&caller, &key)?;
        self.touch(Entity::Stake(owner, key));
        let amount = self.vault.refund(&owner, &key)?;
        self.sync_edge_stake(&key);
        tx.credit(owner, amount);
        info!("Operator {} refunded {} to {} from {}", caller, Trl::from_units(amount), owner, key);
        Ok(amount)
    }

    /// Admin moves slashed collateral out of the reserve.
    pub(crate) fn sweep_slashed(&mut self, tx: &mut TxContext, caller: Principal, recipient: Principal, amount: u64) -> Result<(), TrellisError> {
        self.access.require(Role::Admin, &caller)?;
        self.touch(Entity::Reserve);
        self.vault.reserve_mut().withdraw(amount)?;
        tx.credit(recipient, amount);
        info!("Admin {} swept {} of slashed stake to {}", caller, Trl::from_units(amount), recipient);
        Ok(())
    }
}
