//! Shared application state injected into every Axum handler.

use std::sync::Arc;
use std::time::Duration;

use crate::booking::BookingStore;
use crate::catalog::CatalogStore;
use crate::flash::FlashStore;
use crate::session::SessionStore;

/// Static bank-transfer details shown on the payment page.
#[derive(Debug, Clone)]
pub struct BankDetails {
    pub account: String,
    pub name: String,
}

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped internally) so that Axum
/// can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Bookings and their status lifecycle.
    pub bookings: BookingStore,
    /// Rooms, time slots, decoration styles, and accounts.
    pub catalog: CatalogStore,
    /// Live login sessions and the cookie-signing key.
    pub sessions: SessionStore,
    /// Pending one-shot flash messages.
    pub flash: FlashStore,
    /// Bank-transfer details for the payment page.
    pub bank: Arc<BankDetails>,
}

impl AppState {
    /// Create a new [`AppState`] from the provided stores.
    pub fn new(
        bookings: BookingStore,
        catalog: CatalogStore,
        sessions: SessionStore,
        flash: FlashStore,
        bank: BankDetails,
    ) -> Self {
        Self {
            bookings,
            catalog,
            sessions,
            flash,
            bank: Arc::new(bank),
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with empty stores, suitable for tests.
    fn default() -> Self {
        Self::new(
            BookingStore::new(),
            CatalogStore::new(),
            SessionStore::new([0u8; 32], Duration::from_secs(3600)),
            FlashStore::new(Duration::from_secs(300)),
            BankDetails {
                account: "1234567890".into(),
                name: "VCB - Ngân hàng TMCP Ngoại thương Việt Nam".into(),
            },
        )
    }
}
