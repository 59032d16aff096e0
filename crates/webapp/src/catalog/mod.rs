//! Catalog loading from disk, lookups, and background refresh.
//!
//! # Responsibilities
//!
//! - Read the catalog JSON file at startup and on a refresh interval.
//! - Serve lock-free lookups of rooms, time slots, decoration styles, and
//!   user accounts to the request handlers.
//!
//! # Module invariants
//!
//! - **No booking dependencies.** This module must not import anything from
//!   `crate::booking`; availability rules live with the booking store.

pub mod store;

pub use store::CatalogStore;

use anyhow::{Context, Result};
use common::catalog::CatalogFile;
use tokio::time;
use tracing::{info, warn};

use crate::config::Config;

/// Read the catalog file and atomically replace the store contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_all(cfg: &Config, store: &CatalogStore) -> Result<()> {
    let text = tokio::fs::read_to_string(&cfg.catalog_path)
        .await
        .with_context(|| format!("failed to read catalog file: {}", cfg.catalog_path))?;

    let file: CatalogFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse catalog file: {}", cfg.catalog_path))?;

    if file.rooms.is_empty() {
        warn!(path = %cfg.catalog_path, "catalog contains no rooms");
    }

    store.replace_all(file);
    info!(
        rooms = store.rooms_len(),
        time_slots = store.time_slots_len(),
        "catalog refreshed"
    );
    Ok(())
}

/// Spawn a background task that periodically re-reads the catalog file.
///
/// On refresh failure the previous contents are retained and a warning is
/// emitted; the service continues to operate with a stale catalog.
pub fn refresh_task(cfg: Config, store: CatalogStore) -> tokio::task::JoinHandle<()> {
    let interval = std::time::Duration::from_secs(cfg.catalog_refresh_interval_secs);
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        // First tick fires immediately — skip it so we don't double-load at startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match load_all(&cfg, &store).await {
                Ok(()) => {}
                Err(e) => warn!(error = %e, "catalog refresh failed; retaining previous contents"),
            }
        }
    })
}
