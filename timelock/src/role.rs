//! Role bindings for the delay gate.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use civic_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Manages roles, cancels operations and tunes the minimum delay.
    Admin,
    /// Schedules operations.
    Proposer,
    /// Executes ready operations.
    Executor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "Admin",
            Self::Proposer => "Proposer",
            Self::Executor => "Executor",
        };
        f.write_str(name)
    }
}

/// Which addresses hold which role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBindings {
    members: BTreeMap<Role, BTreeSet<Address>>,
}

impl RoleBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `account` may act as `role`. The zero address holding
    /// Executor opens execution to everyone.
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        let Some(set) = self.members.get(&role) else {
            return false;
        };
        set.contains(account) || (role == Role::Executor && set.contains(&Address::ZERO))
    }

    /// Returns `true` if the binding was newly added.
    pub fn grant(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Returns `true` if the binding existed.
    pub fn revoke(&mut self, role: Role, account: &Address) -> bool {
        self.members
            .get_mut(&role)
            .is_some_and(|set| set.remove(account))
    }

    pub fn members(&self, role: Role) -> impl Iterator<Item = &Address> {
        self.members.get(&role).into_iter().flatten()
    }
}
