//! The authorization engine facade.
//!
//! [`AuthService`] owns all shared state (user map, session map, role
//! registry) behind a single coarse lock, making the handle safe to share
//! across threads via `Arc`. No operation blocks on I/O; every call resolves
//! synchronously.
//!
//! Time-dependent operations come in pairs: the plain method stamps
//! `Utc::now()`, the `_at` variant takes `now` explicitly for deterministic
//! tests and replayable callers.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use tillpoint_core::DomainError;

use crate::error::AuthError;
use crate::password::PasswordHash;
use crate::permissions::Permission;
use crate::registry::RoleRegistry;
use crate::roles::Role;
use crate::session::{Session, SessionPolicy, SessionToken};
use crate::store::CredentialStore;
use crate::user::{UserProfile, UserRecord, Username};

/// Result of a successful authentication: the minted token and the
/// credential-free user view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user: UserProfile,
}

#[derive(Debug)]
struct Inner {
    store: CredentialStore,
    registry: RoleRegistry,
}

impl Inner {
    /// Resolve a token to its user record, honoring the TTL policy.
    ///
    /// Expired sessions are purged here, lazily; there is no background
    /// sweep. Orphaned sessions (user deleted) and sessions of suspended
    /// users resolve to `None` via the defensive token→user check.
    fn resolve_user(
        &mut self,
        token: &SessionToken,
        policy: &SessionPolicy,
        now: DateTime<Utc>,
    ) -> Option<&UserRecord> {
        let expired = self
            .store
            .session(token)
            .is_some_and(|s| s.is_expired(policy.ttl, now));
        if expired {
            self.store.remove_session(token);
            return None;
        }
        self.store.user_by_token(token).filter(|user| user.active)
    }
}

/// In-memory credential store, session store, and authorization resolver.
pub struct AuthService {
    policy: SessionPolicy,
    inner: Mutex<Inner>,
}

impl AuthService {
    /// Engine with the default role registry and reference session policy
    /// (no TTL, password changes leave other sessions alive).
    pub fn new() -> Self {
        Self::with_policy(SessionPolicy::default())
    }

    /// Engine with an explicit session policy.
    pub fn with_policy(policy: SessionPolicy) -> Self {
        Self {
            policy,
            inner: Mutex::new(Inner {
                store: CredentialStore::default(),
                registry: RoleRegistry::with_defaults(),
            }),
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    // ── Credential & session store ──────────────────────────────────────────

    /// Register a new user with a freshly salted credential.
    ///
    /// An empty `roles` list defaults to the baseline `user` role. Fails on
    /// empty username/password or a duplicate username; the returned profile
    /// omits the credential.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        roles: Vec<Role>,
    ) -> Result<UserProfile, AuthError> {
        self.register_at(username, password, roles, Utc::now())
    }

    pub fn register_at(
        &self,
        username: &str,
        password: &str,
        roles: Vec<Role>,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, AuthError> {
        let username = Username::parse(username)?;
        if password.is_empty() {
            return Err(DomainError::validation("password required").into());
        }
        let roles = if roles.is_empty() { vec![Role::new("user")] } else { roles };

        let mut inner = self.inner.lock();
        if inner.store.contains_user(&username) {
            return Err(DomainError::conflict("user already exists").into());
        }
        let record = UserRecord::new(username, PasswordHash::new(password), roles, now);
        let profile = record.profile();
        inner.store.insert_user(record);
        tracing::debug!(username = %profile.username, "user registered");
        Ok(profile)
    }

    /// Verify credentials and mint a new session.
    ///
    /// Unknown user and wrong password produce the same error, so callers
    /// cannot enumerate usernames. Concurrent sessions per user are allowed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.authenticate_at(username, password, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthSession, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let mut inner = self.inner.lock();
        let user = inner.store.user(&username).ok_or(AuthError::InvalidCredentials)?;
        if !user.active || !user.credential.verify(password) {
            return Err(AuthError::InvalidCredentials);
        }
        let profile = user.profile();

        let token = SessionToken::mint();
        inner.store.insert_session(Session {
            token,
            username,
            issued_at: now,
        });
        tracing::debug!(username = %profile.username, "session opened");
        Ok(AuthSession { token, user: profile })
    }

    /// Remove a session. Idempotent: reports whether one existed.
    pub fn logout(&self, token: &SessionToken) -> bool {
        let removed = self.inner.lock().store.remove_session(token);
        if let Some(session) = &removed {
            tracing::debug!(username = %session.username, "session closed");
        }
        removed.is_some()
    }

    /// Resolve a token to its user, or `None` for absent, expired, or
    /// orphaned sessions.
    pub fn get_user_by_token(&self, token: &SessionToken) -> Option<UserProfile> {
        self.get_user_by_token_at(token, Utc::now())
    }

    pub fn get_user_by_token_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Option<UserProfile> {
        let mut inner = self.inner.lock();
        inner
            .resolve_user(token, &self.policy, now)
            .map(UserRecord::profile)
    }

    /// Replace a user's credential after re-verifying the old password.
    ///
    /// Whether other live sessions survive is controlled by
    /// [`SessionPolicy::invalidate_sessions_on_password_change`].
    pub fn change_password(&self, username: &str, old: &str, new: &str) -> Result<(), AuthError> {
        self.change_password_at(username, old, new, Utc::now())
    }

    pub fn change_password_at(
        &self,
        username: &str,
        old: &str,
        new: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;
        if new.is_empty() {
            return Err(DomainError::validation("password required").into());
        }

        let mut inner = self.inner.lock();
        let user = inner
            .store
            .user_mut(&username)
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.credential.verify(old) {
            return Err(AuthError::InvalidCredentials);
        }
        user.credential = PasswordHash::new(new);
        user.updated_at = now;

        if self.policy.invalidate_sessions_on_password_change {
            let purged = inner.store.purge_sessions_for(&username);
            tracing::debug!(username = %username, purged, "sessions invalidated on password change");
        }
        Ok(())
    }

    /// Remove a user and invalidate every session bound to them, across all
    /// tokens. Returns whether the user existed.
    pub fn delete_user(&self, username: &str) -> bool {
        let Ok(username) = Username::parse(username) else {
            return false;
        };
        match self.inner.lock().store.remove_user(&username) {
            Some(purged) => {
                tracing::warn!(username = %username, purged_sessions = purged, "user deleted");
                true
            }
            None => false,
        }
    }

    /// Suspend or reactivate a user without touching their credential.
    ///
    /// Suspension takes effect immediately: live sessions stop resolving and
    /// authentication fails until the account is reactivated. Returns whether
    /// the user existed.
    pub fn set_user_active(&self, username: &str, active: bool) -> bool {
        self.set_user_active_at(username, active, Utc::now())
    }

    pub fn set_user_active_at(&self, username: &str, active: bool, now: DateTime<Utc>) -> bool {
        let Ok(username) = Username::parse(username) else {
            return false;
        };
        let mut inner = self.inner.lock();
        match inner.store.user_mut(&username) {
            Some(user) => {
                user.active = active;
                user.updated_at = now;
                true
            }
            None => false,
        }
    }

    /// Every registered user, credentials omitted.
    pub fn list_users(&self) -> Vec<UserProfile> {
        self.inner.lock().store.users().map(UserRecord::profile).collect()
    }

    // ── Authorization resolver ──────────────────────────────────────────────

    /// Set or overwrite a role's permission set. Total replacement; takes
    /// effect immediately for every session holding the role.
    pub fn set_role_permissions(&self, role: Role, permissions: Vec<Permission>) {
        self.inner.lock().registry.set(role, permissions);
    }

    pub fn get_role_permissions(&self, role: &Role) -> Vec<Permission> {
        self.inner.lock().registry.get(role)
    }

    pub fn list_roles(&self) -> Vec<Role> {
        self.inner.lock().registry.roles()
    }

    /// Union of the permission sets of the user's roles, deduplicated and
    /// ordered. Empty for an invalid token.
    pub fn get_permissions_for_user(&self, token: &SessionToken) -> Vec<Permission> {
        self.get_permissions_for_user_at(token, Utc::now())
    }

    pub fn get_permissions_for_user_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Vec<Permission> {
        let mut inner = self.inner.lock();
        let Some(user) = inner.resolve_user(token, &self.policy, now) else {
            return Vec::new();
        };
        let roles = user.roles.clone();
        inner.registry.effective(&roles).into_iter().collect()
    }

    /// Does this token currently grant this permission?
    ///
    /// Checked in precedence order: invalid token, universal wildcard,
    /// literal match, namespace wildcard of the request, then a scan for any
    /// `prefix.*` grant covering the request. The ordering only short-circuits;
    /// any single match grants.
    pub fn has_permission(&self, token: &SessionToken, required: &Permission) -> bool {
        self.has_permission_at(token, required, Utc::now())
    }

    pub fn has_permission_at(
        &self,
        token: &SessionToken,
        required: &Permission,
        now: DateTime<Utc>,
    ) -> bool {
        let mut inner = self.inner.lock();
        let Some(user) = inner.resolve_user(token, &self.policy, now) else {
            return false;
        };
        let roles = user.roles.clone();
        let effective = inner.registry.effective(&roles);

        if effective.contains(&Permission::new("*")) {
            return true;
        }
        if effective.contains(required) {
            return true;
        }
        if let Some(ns) = required.namespace_wildcard() {
            if effective.contains(&ns) {
                return true;
            }
        }
        effective.iter().any(|granted| granted.grants(required))
    }

    /// Direct role membership, independent of permission resolution.
    pub fn has_role(&self, token: &SessionToken, role: &Role) -> bool {
        self.has_role_at(token, role, Utc::now())
    }

    pub fn has_role_at(&self, token: &SessionToken, role: &Role, now: DateTime<Utc>) -> bool {
        let mut inner = self.inner.lock();
        inner
            .resolve_user(token, &self.policy, now)
            .is_some_and(|user| user.roles.contains(role))
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
