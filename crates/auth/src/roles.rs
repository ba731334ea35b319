use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tillpoint_core::ValueObject;

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at this layer; the [`crate::RoleRegistry`] maps
/// them to permission sets. Role names are normalized (trimmed, lowercased)
/// the same way usernames are, so `"Cashier "` and `"cashier"` address the
/// same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Cow::Owned(name.as_ref().trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Role {}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_normalized() {
        assert_eq!(Role::new("  Cashier "), Role::new("cashier"));
        assert_eq!(Role::new("ADMIN").as_str(), "admin");
    }
}
