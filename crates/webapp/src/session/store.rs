//! [`SessionStore`]: server-side registry of live login sessions.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use super::cookie;

#[derive(Debug, Clone)]
struct Session {
    user_id: i64,
    expires_at: OffsetDateTime,
}

/// Thread-safe store of live sessions plus the cookie-signing key.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, Session>>,
    key: Arc<[u8; 32]>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a new, empty [`SessionStore`] signing with `key`.
    pub fn new(key: [u8; 32], ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            key: Arc::new(key),
            ttl,
        }
    }

    /// Start a session for `user_id` and return the signed cookie value.
    pub fn issue(&self, user_id: i64) -> String {
        let sid = Uuid::new_v4();
        self.sessions.insert(
            sid,
            Session {
                user_id,
                expires_at: OffsetDateTime::now_utc() + self.ttl,
            },
        );
        cookie::encode(sid, &self.key)
    }

    /// Resolve a signed cookie value back to a user id.
    ///
    /// Returns `None` for a bad signature, an unknown session, or an expired
    /// one; expired entries are dropped on the way out.
    pub fn resolve(&self, cookie_value: &str) -> Option<i64> {
        let sid = cookie::decode(cookie_value, &self.key)?;
        let session = self.sessions.get(&sid)?.clone();
        if session.expires_at <= OffsetDateTime::now_utc() {
            drop(self.sessions.remove(&sid));
            return None;
        }
        Some(session.user_id)
    }

    /// Revoke the session named by a signed cookie value, if any.
    pub fn revoke(&self, cookie_value: &str) {
        if let Some(sid) = cookie::decode(cookie_value, &self.key) {
            self.sessions.remove(&sid);
        }
    }

    /// Drop all expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }

    /// Number of live sessions.
    pub fn active(&self) -> usize {
        self.sessions.len()
    }

    /// Session TTL in seconds, for the cookie `Max-Age`.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the signing key.
        f.debug_struct("SessionStore")
            .field("active", &self.sessions.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
