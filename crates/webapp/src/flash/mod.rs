//! One-shot flash messages carried across redirects.
//!
//! A handler that redirects stashes its message in the [`FlashStore`] and
//! appends the returned token to the redirect target as a `flash` query
//! parameter. The rendering handler takes the message by token — reading it
//! destroys it, so a reload of the target page shows no stale banner.
//! Unclaimed messages (e.g. the browser never followed the redirect) expire
//! via a background sweeper.

pub mod store;

pub use store::FlashStore;

use tokio::time;
use tracing::debug;

/// How often the background sweeper scans for expired messages.
const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Severity of a flash message; selects the banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A message shown on exactly one subsequent page view.
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }

    /// Used by the views to pick the banner style.
    pub fn is_error(&self) -> bool {
        self.kind == FlashKind::Error
    }
}

/// Spawn a background task that periodically drops expired messages.
pub fn sweep_task(store: FlashStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(SWEEP_INTERVAL);
        // First tick fires immediately — nothing can have expired yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let dropped = store.purge_expired();
            if dropped > 0 {
                debug!(dropped, "unclaimed flash messages purged");
            }
        }
    })
}
