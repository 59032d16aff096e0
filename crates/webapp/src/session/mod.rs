//! Login sessions: server-side store plus signed `sid` cookie codec.
//!
//! # Lifecycle
//!
//! 1. A successful login allocates a random session id, stores it server-side
//!    with a TTL, and hands the browser an HMAC-signed cookie value.
//! 2. Handlers resolve the cookie back to a user id via [`SessionStore`];
//!    a bad signature, unknown id, or expired entry all read as "not logged
//!    in" — never as an error surfaced to the client.
//! 3. Logout revokes the server-side entry; a background sweeper drops
//!    expired entries that were never revoked.
//!
//! The signing key comes from configuration, or is generated at startup when
//! unset (sessions then do not survive a restart).

pub mod cookie;
pub mod store;

pub use store::SessionStore;

use tokio::time;
use tracing::debug;

/// How often the background sweeper scans for expired sessions.
const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Spawn a background task that periodically drops expired sessions.
pub fn sweep_task(store: SessionStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(SWEEP_INTERVAL);
        // First tick fires immediately — nothing can have expired yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let dropped = store.purge_expired();
            if dropped > 0 {
                debug!(dropped, "expired sessions purged");
            }
        }
    })
}
