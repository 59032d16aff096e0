//! `venuebook` — web application entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing).
//! 3. Load the catalog file into [`CatalogStore`].
//! 4. Derive the session-cookie signing key and seed the stores.
//! 5. Spawn background tasks: catalog refresh, session sweep, flash sweep.
//! 6. Build the Axum router and start the server.

mod booking;
mod catalog;
mod config;
mod flash;
mod server;
mod session;
mod telemetry;
mod users;

use std::time::Duration;

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::info;

use booking::BookingStore;
use catalog::CatalogStore;
use config::Config;
use flash::FlashStore;
use server::state::{AppState, BankDetails};
use session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.bind_port,
        "venuebook starting"
    );

    // -----------------------------------------------------------------------
    // 3. Catalog
    // -----------------------------------------------------------------------
    let catalog_store = CatalogStore::new();
    catalog::load_all(&cfg, &catalog_store).await?;

    // -----------------------------------------------------------------------
    // 4. Stores
    // -----------------------------------------------------------------------
    let sessions = SessionStore::new(
        session_key(&cfg)?,
        Duration::from_secs(cfg.session_ttl_secs),
    );
    let flash_store = FlashStore::new(Duration::from_secs(cfg.flash_ttl_secs));

    // -----------------------------------------------------------------------
    // 5. Background tasks
    // -----------------------------------------------------------------------
    let _catalog_refresh = catalog::refresh_task(cfg.clone(), catalog_store.clone());
    let _session_sweep = session::sweep_task(sessions.clone());
    let _flash_sweep = flash::sweep_task(flash_store.clone());

    // -----------------------------------------------------------------------
    // 6. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(
        BookingStore::new(),
        catalog_store,
        sessions,
        flash_store,
        BankDetails {
            account: cfg.bank_account.clone(),
            name: cfg.bank_name.clone(),
        },
    );
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.bind_port).into();
    info!(addr = %addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// The cookie-signing key: configured hex, or randomly generated (sessions
/// then do not survive a restart).
fn session_key(cfg: &Config) -> Result<[u8; 32]> {
    let Some(hex_key) = &cfg.session_key_hex else {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        return Ok(key);
    };
    let bytes = hex::decode(hex_key).context("SESSION_KEY_HEX is not valid hex")?;
    bytes
        .as_slice()
        .try_into()
        .context("SESSION_KEY_HEX must decode to 32 bytes")
}
