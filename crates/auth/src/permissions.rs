use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tillpoint_core::ValueObject;

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "orders.create"). Two
/// wildcard shapes are recognized at resolution time: the universal wildcard
/// `"*"` (all permissions) and namespace wildcards such as `"orders.*"`.
/// No schema validates permission strings - services declare new capabilities
/// without touching this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the universal wildcard `"*"`.
    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// The `"ns.*"` form covering this permission's namespace, if it has one.
    ///
    /// `"orders.create"` → `Some("orders.*")`; a permission without a dot has
    /// no namespace to widen.
    pub fn namespace_wildcard(&self) -> Option<Permission> {
        let (ns, _) = self.as_str().split_once('.')?;
        Some(Permission::new(format!("{ns}.*")))
    }

    /// Whether this permission, held as a grant, covers `required`.
    ///
    /// A grant covers a request when it is the universal wildcard, the exact
    /// string, or a `prefix.*` wildcard whose prefix is a dot-prefix of the
    /// request (`"orders.*"` covers `"orders.items.add"`).
    pub fn grants(&self, required: &Permission) -> bool {
        if self.is_wildcard() {
            return true;
        }
        if self == required {
            return true;
        }
        if let Some(prefix) = self.as_str().strip_suffix(".*") {
            return required
                .as_str()
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'));
        }
        false
    }
}

impl ValueObject for Permission {}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_wildcard_grants_everything() {
        let star = Permission::new("*");
        assert!(star.grants(&Permission::new("orders.create")));
        assert!(star.grants(&Permission::new("literally.anything")));
        assert!(star.grants(&Permission::new("nodot")));
    }

    #[test]
    fn literal_grants_only_itself() {
        let p = Permission::new("orders.create");
        assert!(p.grants(&Permission::new("orders.create")));
        assert!(!p.grants(&Permission::new("orders.cancel")));
        assert!(!p.grants(&Permission::new("orders")));
    }

    #[test]
    fn namespace_wildcard_grants_whole_namespace() {
        let ns = Permission::new("orders.*");
        assert!(ns.grants(&Permission::new("orders.create")));
        assert!(ns.grants(&Permission::new("orders.items.add")));
        assert!(!ns.grants(&Permission::new("inventory.adjust")));
        // The bare namespace name itself is not inside the namespace.
        assert!(!ns.grants(&Permission::new("orders")));
        // Prefix match is segment-wise, not raw string prefix.
        assert!(!ns.grants(&Permission::new("ordersx.create")));
    }

    #[test]
    fn namespace_wildcard_of_a_permission() {
        assert_eq!(
            Permission::new("orders.create").namespace_wildcard(),
            Some(Permission::new("orders.*"))
        );
        assert_eq!(
            Permission::new("orders.items.add").namespace_wildcard(),
            Some(Permission::new("orders.*"))
        );
        assert_eq!(Permission::new("orders").namespace_wildcard(), None);
        assert_eq!(Permission::new("*").namespace_wildcard(), None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: the universal wildcard grants any permission string.
            #[test]
            fn star_grants_anything(p in "[a-z][a-z0-9_.]{0,40}") {
                prop_assert!(Permission::new("*").grants(&Permission::new(p)));
            }

            /// Property: a literal always grants itself.
            #[test]
            fn literal_grants_itself(p in "[a-z][a-z0-9_.]{0,40}") {
                let perm = Permission::new(p);
                prop_assert!(perm.grants(&perm.clone()));
            }

            /// Property: `ns.*` grants `ns.<anything>`.
            #[test]
            fn namespace_wildcard_grants_members(
                ns in "[a-z][a-z0-9_]{0,15}",
                action in "[a-z][a-z0-9_.]{0,20}"
            ) {
                let grant = Permission::new(format!("{ns}.*"));
                let requested = Permission::new(format!("{ns}.{action}"));
                prop_assert!(grant.grants(&requested));
            }

            /// Property: an unrelated literal never grants a different
            /// namespace's permission.
            #[test]
            fn unrelated_literal_never_grants(
                ns in "[a-z][a-z0-9_]{0,15}",
                action in "[a-z][a-z0-9_]{1,15}"
            ) {
                let grant = Permission::new(format!("{ns}.{action}"));
                let requested = Permission::new(format!("other_{ns}.{action}"));
                prop_assert!(!grant.grants(&requested));
            }
        }
    }
}
