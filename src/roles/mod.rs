// Role-based authorization.
//
// A principal may hold any subset of roles. Membership is a set of
// principals per role; grant/revoke are idempotent set operations.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Error, Formatter};

use crate::crypto::Principal;

/// Named capability grants recognized by the governor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Root role, granted only at construction.
    DefaultAdmin,
    /// Manages role membership and the pause switch.
    Admin,
    /// Schedules and executes time-locked operations.
    Operator,
    /// Creates proposals and casts votes.
    Governance,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "default-admin",
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Governance => "governance",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Set-of-principals per role. Insertion order is preserved so that
/// serialized registries are deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    holders: IndexMap<Role, IndexSet<Principal>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure read, never blocked by pause.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.holders
            .get(&role)
            .is_some_and(|set| set.contains(principal))
    }

    /// Idempotent insert. Returns true when membership actually changed.
    pub fn grant(&mut self, role: Role, principal: Principal) -> bool {
        self.holders.entry(role).or_default().insert(principal)
    }

    /// Idempotent removal. Returns true when membership actually changed.
    pub fn revoke(&mut self, role: Role, principal: &Principal) -> bool {
        self.holders
            .get_mut(&role)
            .is_some_and(|set| set.shift_remove(principal))
    }

    /// Number of principals currently holding the role.
    pub fn holder_count(&self, role: Role) -> usize {
        self.holders.get(&role).map_or(0, |set| set.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(byte: u8) -> Principal {
        Principal::new([byte; 32])
    }

    #[test]
    fn grant_is_idempotent() {
        let mut registry = RoleRegistry::new();
        assert!(registry.grant(Role::Operator, p(1)));
        assert!(!registry.grant(Role::Operator, p(1)));
        assert!(registry.has_role(Role::Operator, &p(1)));
        assert_eq!(registry.holder_count(Role::Operator), 1);
    }

    #[test]
    fn revoke_is_idempotent() {
        let mut registry = RoleRegistry::new();
        registry.grant(Role::Admin, p(1));
        assert!(registry.revoke(Role::Admin, &p(1)));
        assert!(!registry.revoke(Role::Admin, &p(1)));
        assert!(!registry.has_role(Role::Admin, &p(1)));
    }

    #[test]
    fn roles_are_independent() {
        let mut registry = RoleRegistry::new();
        registry.grant(Role::Operator, p(1));
        assert!(!registry.has_role(Role::Admin, &p(1)));
        assert!(!registry.has_role(Role::Operator, &p(2)));
    }

    #[test]
    fn registry_serde_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let mut registry = RoleRegistry::new();
        registry.grant(Role::Governance, p(3));
        let data = serde_json::to_vec(&registry)?;
        let decoded: RoleRegistry = serde_json::from_slice(&data)?;
        assert!(decoded.has_role(Role::Governance, &p(3)));
        Ok(())
    }
}
