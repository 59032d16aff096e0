//! [`FlashStore`]: token-keyed store of pending flash messages.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use super::FlashMessage;

#[derive(Debug, Clone)]
struct Entry {
    message: FlashMessage,
    expires_at: OffsetDateTime,
}

/// Thread-safe store of flash messages awaiting their one page view.
#[derive(Clone, Debug)]
pub struct FlashStore {
    entries: Arc<DashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl FlashStore {
    /// Create a new, empty [`FlashStore`].
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Stash a message and return the token that redeems it.
    pub fn stash(&self, message: FlashMessage) -> Uuid {
        let token = Uuid::new_v4();
        self.entries.insert(
            token,
            Entry {
                message,
                expires_at: OffsetDateTime::now_utc() + self.ttl,
            },
        );
        token
    }

    /// Redeem a token. The message is removed — a second take returns `None`.
    pub fn take(&self, token: Uuid) -> Option<FlashMessage> {
        let (_, entry) = self.entries.remove(&token)?;
        if entry.expires_at <= OffsetDateTime::now_utc() {
            return None;
        }
        Some(entry.message)
    }

    /// Drop all expired messages, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        before - self.entries.len()
    }

    /// Number of pending messages.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no messages are pending.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FlashKind;

    #[test]
    fn take_is_single_use() {
        let store = FlashStore::new(Duration::from_secs(300));
        let token = store.stash(FlashMessage::success("Hủy đặt phòng thành công!"));
        let msg = store.take(token).unwrap();
        assert_eq!(msg.kind, FlashKind::Success);
        assert_eq!(msg.text, "Hủy đặt phòng thành công!");
        assert!(store.take(token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_token_yields_nothing() {
        let store = FlashStore::new(Duration::from_secs(300));
        assert!(store.take(Uuid::new_v4()).is_none());
    }

    #[test]
    fn expired_message_is_not_served() {
        let store = FlashStore::new(Duration::ZERO);
        let token = store.stash(FlashMessage::error("x"));
        assert!(store.take(token).is_none());
    }

    #[test]
    fn purge_only_removes_expired() {
        let store = FlashStore::new(Duration::from_secs(300));
        store.stash(FlashMessage::success("a"));
        store.stash(FlashMessage::error("b"));
        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 2);
    }
}
