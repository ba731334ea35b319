use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Username;

/// Opaque session token.
///
/// A random identifier, not a signed or self-describing credential: it means
/// nothing without the session store that minted it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Mint a fresh random token.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A live session: token → user binding plus issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub username: Username,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has outlived `ttl` as of `now`.
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match ttl {
            Some(ttl) => now >= self.issued_at + ttl,
            None => false,
        }
    }
}

/// Session lifecycle policy.
///
/// The reference behavior (no TTL, password changes leave other sessions
/// alive) is the default; both knobs are explicit configuration rather than
/// baked-in assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPolicy {
    /// Sessions older than this resolve as invalid and are purged lazily at
    /// lookup. `None` means tokens live until logout or user deletion.
    pub ttl: Option<Duration>,

    /// Whether a successful password change removes every session of that
    /// user. Off by default; leaving stale sessions alive after a password
    /// change is a known gap in the reference behavior.
    pub invalidate_sessions_on_password_change: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ttl_never_expires() {
        let session = Session {
            token: SessionToken::mint(),
            username: Username::parse("alice").unwrap(),
            issued_at: Utc::now() - Duration::days(365),
        };
        assert!(!session.is_expired(None, Utc::now()));
    }

    #[test]
    fn ttl_expires_after_window() {
        let issued = Utc::now();
        let session = Session {
            token: SessionToken::mint(),
            username: Username::parse("alice").unwrap(),
            issued_at: issued,
        };
        let ttl = Some(Duration::minutes(30));
        assert!(!session.is_expired(ttl, issued + Duration::minutes(29)));
        assert!(session.is_expired(ttl, issued + Duration::minutes(30)));
        assert!(session.is_expired(ttl, issued + Duration::hours(2)));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(SessionToken::mint(), SessionToken::mint());
    }
}
