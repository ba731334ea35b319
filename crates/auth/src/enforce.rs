//! Enforcement contract for protected operations.
//!
//! Consuming services receive an [`Enforcer`] at construction time and carry
//! the caller's token as a dedicated parameter of every protected operation.
//! There is no post-construction rebinding and no runtime discovery of the
//! token among arguments: the contract is explicit in the signature, and the
//! only runtime failure modes are the fail-closed denials.
//!
//! The token parameter is `Option<&SessionToken>` at the integration
//! boundary. Services that can run standalone compose with
//! [`Enforcer::disabled`], in which case every check is a no-op and calls
//! proceed unchecked.

use std::sync::Arc;

use crate::error::AuthError;
use crate::permissions::Permission;
use crate::service::AuthService;
use crate::session::SessionToken;

/// Authorization guard injected into consuming services.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone, Default)]
pub struct Enforcer {
    backend: Option<Arc<AuthService>>,
}

impl Enforcer {
    /// Enforce against a shared authorization backend.
    pub fn new(backend: Arc<AuthService>) -> Self {
        Self { backend: Some(backend) }
    }

    /// The explicit "authorization optional" composition mode: every check
    /// passes and operations run unchecked.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// The uniform pass/fail decision for one protected call.
    ///
    /// Fails closed: a missing token (with a backend configured) is
    /// [`AuthError::MissingActorToken`]; an insufficient permission set is
    /// [`AuthError::PermissionDenied`].
    pub fn check(
        &self,
        token: Option<&SessionToken>,
        required: &Permission,
    ) -> Result<(), AuthError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let token = token.ok_or(AuthError::MissingActorToken)?;
        if backend.has_permission(token, required) {
            Ok(())
        } else {
            tracing::debug!(permission = %required, "permission denied");
            Err(AuthError::PermissionDenied(required.as_str().to_string()))
        }
    }

    /// Run `op` only if `check` passes.
    ///
    /// The wrapper adds no side effects of its own: on denial the operation
    /// is never invoked, on success it runs with its arguments untouched.
    pub fn enforce<T>(
        &self,
        token: Option<&SessionToken>,
        required: &Permission,
        op: impl FnOnce() -> T,
    ) -> Result<T, AuthError> {
        self.check(token, required)?;
        Ok(op())
    }

    /// Non-raising form of `check`, for courtesy side-channel actions
    /// (audit trails, notifications) where a denial must never abort the
    /// primary operation it is attached to.
    pub fn is_allowed(&self, token: Option<&SessionToken>, required: &Permission) -> bool {
        self.check(token, required).is_ok()
    }
}

impl core::fmt::Debug for Enforcer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Enforcer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
