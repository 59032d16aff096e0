//! On-disk catalog file format.
//!
//! The catalog is a single JSON document listing the rooms, time slots,
//! decoration styles, and user accounts the site offers. The `webapp` crate
//! loads it at startup and re-reads it on a refresh interval, so the file can
//! be edited in place without a restart.

use serde::{Deserialize, Serialize};

use crate::model::{DecorationStyle, Room, TimeSlot, User};

/// Root of the catalog JSON document.
///
/// Every section defaults to empty so a partial file (e.g. rooms only) still
/// parses; validation of what a usable catalog must contain lives with the
/// loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub decoration_styles: Vec<DecorationStyle>,
    #[serde(default)]
    pub users: Vec<User>,
}
