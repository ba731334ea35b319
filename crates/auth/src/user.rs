use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_core::{DomainError, DomainResult, ValueObject};

use crate::password::PasswordHash;
use crate::roles::Role;

/// Normalized username: trimmed and lowercased before storage or lookup.
///
/// `"  Alice "` and `"alice"` address the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Normalize and validate a raw username.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("username required"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Username {}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored user account.
///
/// Owned exclusively by the credential store; the credential never leaves it.
/// External callers only ever see the [`UserProfile`] projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserRecord {
    pub username: Username,
    pub credential: PasswordHash,
    pub roles: Vec<Role>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(username: Username, credential: PasswordHash, roles: Vec<Role>, now: DateTime<Utc>) -> Self {
        Self {
            username,
            credential,
            roles,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public projection with the credential omitted.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            roles: self.roles.clone(),
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Credential-free view of a user record, safe to hand to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: Username,
    pub roles: Vec<Role>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}
