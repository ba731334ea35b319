//! In-memory credential & session store.
//!
//! Plain maps with no locking of their own; the owning [`crate::AuthService`]
//! serializes access behind its coarse lock. Lookups that cross the
//! session→user edge treat orphaned sessions (user deleted, token never
//! purged) as invalid rather than trusting the token record.

use std::collections::HashMap;

use crate::session::{Session, SessionToken};
use crate::user::{UserRecord, Username};

#[derive(Debug, Default)]
pub(crate) struct CredentialStore {
    users: HashMap<Username, UserRecord>,
    sessions: HashMap<SessionToken, Session>,
}

impl CredentialStore {
    pub fn contains_user(&self, username: &Username) -> bool {
        self.users.contains_key(username)
    }

    pub fn user(&self, username: &Username) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn user_mut(&mut self, username: &Username) -> Option<&mut UserRecord> {
        self.users.get_mut(username)
    }

    pub fn insert_user(&mut self, record: UserRecord) {
        self.users.insert(record.username.clone(), record);
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    /// Remove a user and every session bound to it, across all tokens.
    ///
    /// Returns the number of sessions invalidated, or `None` if the user did
    /// not exist.
    pub fn remove_user(&mut self, username: &Username) -> Option<usize> {
        self.users.remove(username)?;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.username != *username);
        Some(before - self.sessions.len())
    }

    pub fn insert_session(&mut self, session: Session) {
        self.sessions.insert(session.token, session);
    }

    pub fn remove_session(&mut self, token: &SessionToken) -> Option<Session> {
        self.sessions.remove(token)
    }

    pub fn session(&self, token: &SessionToken) -> Option<&Session> {
        self.sessions.get(token)
    }

    /// Resolve token → username → record, rejecting orphaned sessions.
    pub fn user_by_token(&self, token: &SessionToken) -> Option<&UserRecord> {
        let session = self.sessions.get(token)?;
        self.users.get(&session.username)
    }

    /// Drop every session for one user (password-change invalidation).
    pub fn purge_sessions_for(&mut self, username: &Username) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.username != *username);
        before - self.sessions.len()
    }
}
