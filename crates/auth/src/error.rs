use thiserror::Error;

use tillpoint_core::DomainError;

/// Engine-level authorization error.
///
/// Every variant is fail-closed: absence of evidence of permission is denial,
/// never an implicit grant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed or duplicate input (e.g. empty username, user already exists).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Authentication failed.
    ///
    /// The message is identical for "unknown user" and "wrong password" so
    /// callers cannot enumerate usernames through it.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Enforcement could not locate a caller identity.
    ///
    /// This is an integration error in the calling service, surfaced
    /// immediately and never defaulted to "allow".
    #[error("missing actor token for permission check")]
    MissingActorToken,

    /// The caller's effective permission set does not grant the required
    /// permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}
