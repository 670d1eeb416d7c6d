// crates/trellis-graph/src/access.rs
//
// Explicit approved-principal sets, checked at the start of each privileged
// call. There is no role inheritance: an admin is not implicitly an
// invalidator or a vault operator.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use trellis_core::{Principal, TrellisError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Adjusts configuration and manages role membership.
    Admin,
    /// May invalidate Active or Disputed edges.
    Invalidator,
    /// May call the privileged stake-vault operations directly.
    VaultOperator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Invalidator => write!(f, "invalidator"),
            Role::VaultOperator => write!(f, "vault-operator"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    admins: BTreeSet<Principal>,
    invalidators: BTreeSet<Principal>,
    vault_operators: BTreeSet<Principal>,
}

impl AccessControl {
    /// Start with a single genesis administrator.
    pub fn with_admin(admin: Principal) -> Self {
        let mut access = Self::default();
        access.admins.insert(admin);
        access
    }

    pub fn has_role(&self, role: Role, who: &Principal) -> bool {
        self.members(role).contains(who)
    }

    /// # Errors
    /// `NotAuthorized` if `who` is not in the role's set.
    pub fn require(&self, role: Role, who: &Principal) -> Result<(), TrellisError> {
        if self.has_role(role, who) {
            Ok(())
        } else {
            Err(TrellisError::NotAuthorized(format!("{} is not a {}", who, role)))
        }
    }

    /// Returns false if `who` already held the role.
    pub fn grant(&mut self, role: Role, who: Principal) -> bool {
        self.members_mut(role).insert(who)
    }

    /// # Errors
    /// `NotAuthorized` when revoking the last admin.
    pub fn revoke(&mut self, role: Role, who: &Principal) -> Result<bool, TrellisError> {
        if role == Role::Admin && self.admins.len() == 1 && self.admins.contains(who) {
            return Err(TrellisError::NotAuthorized(
                "cannot revoke the last admin".to_string(),
            ));
        }
        Ok(self.members_mut(role).remove(who))
    }

    pub fn members(&self, role: Role) -> &BTreeSet<Principal> {
        match role {
            Role::Admin => &self.admins,
            Role::Invalidator => &self.invalidators,
            Role::VaultOperator => &self.vault_operators,
        }
    }

    fn members_mut(&mut self, role: Role) -> &mut BTreeSet<Principal> {
        match role {
            Role::Admin => &mut self.admins,
            Role::Invalidator => &mut self.invalidators,
            Role::VaultOperator => &mut self.vault_operators,
        }
    }
}
