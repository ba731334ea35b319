//! Role → permission registry.

use std::collections::{BTreeSet, HashMap};

use crate::permissions::Permission;
use crate::roles::Role;

/// Mapping from role to its granted permission set.
///
/// Writes replace a role's set wholesale; there is no merge and no
/// versioning. Overrides take effect immediately for every session holding
/// the role, since resolution always reads the live registry.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl RoleRegistry {
    /// An empty registry with no roles defined.
    pub fn empty() -> Self {
        Self { grants: HashMap::new() }
    }

    /// Registry seeded with the back office's operational roles.
    ///
    /// `admin` holds the universal wildcard; `user` is the baseline role new
    /// accounts receive and grants nothing by itself.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.set(Role::new("admin"), [Permission::new("*")]);
        registry.set(
            Role::new("manager"),
            [
                Permission::new("orders.view"),
                Permission::new("reports.export"),
                Permission::new("inventory.view"),
                Permission::new("print.any"),
            ],
        );
        registry.set(
            Role::new("cashier"),
            [
                Permission::new("orders.create"),
                Permission::new("orders.view"),
                Permission::new("print.receipt"),
            ],
        );
        registry.set(
            Role::new("kitchen"),
            [Permission::new("orders.view"), Permission::new("print.kitchen")],
        );
        registry.set(Role::new("user"), []);
        registry
    }

    /// Set or overwrite a role's permissions. Total replacement, never a merge.
    pub fn set(&mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) {
        self.grants.insert(role, permissions.into_iter().collect());
    }

    /// Permissions currently granted to a role (empty for unknown roles).
    pub fn get(&self, role: &Role) -> Vec<Permission> {
        self.grants
            .get(role)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every role the registry knows about.
    pub fn roles(&self) -> Vec<Role> {
        self.grants.keys().cloned().collect()
    }

    /// Union of the permission sets of `roles`, deduplicated and ordered.
    pub fn effective(&self, roles: &[Role]) -> BTreeSet<Permission> {
        roles
            .iter()
            .filter_map(|role| self.grants.get(role))
            .flat_map(|set| set.iter().cloned())
            .collect()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_operational_roles() {
        let registry = RoleRegistry::with_defaults();
        assert!(registry.get(&Role::new("admin")).contains(&Permission::new("*")));
        assert!(
            registry
                .get(&Role::new("cashier"))
                .contains(&Permission::new("orders.create"))
        );
        assert!(registry.get(&Role::new("user")).is_empty());
        assert!(registry.get(&Role::new("nonexistent")).is_empty());
    }

    #[test]
    fn set_replaces_rather_than_merges() {
        let mut registry = RoleRegistry::empty();
        registry.set(Role::new("cashier"), [Permission::new("a")]);
        registry.set(Role::new("cashier"), [Permission::new("b")]);
        assert_eq!(registry.get(&Role::new("cashier")), vec![Permission::new("b")]);
    }

    #[test]
    fn effective_set_unions_across_roles() {
        let mut registry = RoleRegistry::empty();
        registry.set(
            Role::new("cashier"),
            [Permission::new("orders.create"), Permission::new("orders.view")],
        );
        registry.set(
            Role::new("kitchen"),
            [Permission::new("orders.view"), Permission::new("print.kitchen")],
        );

        let effective = registry.effective(&[Role::new("cashier"), Role::new("kitchen")]);
        assert_eq!(effective.len(), 3);
        assert!(effective.contains(&Permission::new("orders.create")));
        assert!(effective.contains(&Permission::new("print.kitchen")));
    }

    #[test]
    fn unknown_roles_contribute_nothing() {
        let registry = RoleRegistry::empty();
        assert!(registry.effective(&[Role::new("ghost")]).is_empty());
    }
}
