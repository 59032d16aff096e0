//! In-memory catalog of rooms, time slots, decoration styles, and accounts.
//!
//! Loaded at startup and refreshed on a configurable interval. The store uses
//! `arc-swap` for lock-free reads on the request path.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use common::catalog::CatalogFile;
use common::model::{DecorationStyle, Room, TimeSlot, User};

/// Indexed view of one catalog file revision.
#[derive(Debug, Default)]
struct Snapshot {
    rooms: Vec<Room>,
    time_slots: Vec<TimeSlot>,
    decoration_styles: Vec<DecorationStyle>,
    rooms_by_id: HashMap<i64, Room>,
    time_slots_by_id: HashMap<i64, TimeSlot>,
    decoration_styles_by_id: HashMap<i64, DecorationStyle>,
    users_by_id: HashMap<i64, User>,
    users_by_username: HashMap<String, User>,
}

impl Snapshot {
    fn from_file(file: CatalogFile) -> Self {
        let rooms_by_id = file.rooms.iter().map(|r| (r.id, r.clone())).collect();
        let time_slots_by_id = file.time_slots.iter().map(|t| (t.id, t.clone())).collect();
        let decoration_styles_by_id = file
            .decoration_styles
            .iter()
            .map(|d| (d.id, d.clone()))
            .collect();
        let users_by_id = file.users.iter().map(|u| (u.id, u.clone())).collect();
        let users_by_username = file
            .users
            .iter()
            .map(|u| (u.username.to_lowercase(), u.clone()))
            .collect();

        let mut rooms = file.rooms;
        rooms.sort_by_key(|r| r.id);

        // Listings show only active slots, in their configured order; lookups
        // by id resolve inactive slots as well.
        let mut time_slots = file.time_slots;
        time_slots.sort_by_key(|t| t.sort_order);

        let mut decoration_styles = file.decoration_styles;
        decoration_styles.sort_by_key(|d| d.id);

        Self {
            rooms,
            time_slots,
            decoration_styles,
            rooms_by_id,
            time_slots_by_id,
            decoration_styles_by_id,
            users_by_id,
            users_by_username,
        }
    }
}

/// Shared, lock-free catalog store.
///
/// Internally backed by [`ArcSwap`] so readers never block and the background
/// refresh task can atomically swap in a completely new snapshot.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    inner: Arc<ArcSwap<Snapshot>>,
}

impl CatalogStore {
    /// Create a new, empty [`CatalogStore`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(Snapshot::default()))),
        }
    }

    /// Atomically replace the entire catalog with the contents of `file`.
    pub fn replace_all(&self, file: CatalogFile) {
        self.inner.store(Arc::new(Snapshot::from_file(file)));
    }

    /// All rooms, ordered by id.
    pub fn rooms(&self) -> Vec<Room> {
        self.inner.load().rooms.clone()
    }

    /// Active time slots, ordered by their configured sort order.
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.inner
            .load()
            .time_slots
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect()
    }

    /// All decoration styles, ordered by id.
    pub fn decoration_styles(&self) -> Vec<DecorationStyle> {
        self.inner.load().decoration_styles.clone()
    }

    /// Look up a room by id.
    pub fn room(&self, id: i64) -> Option<Room> {
        self.inner.load().rooms_by_id.get(&id).cloned()
    }

    /// Look up a time slot by id (active or not).
    pub fn time_slot(&self, id: i64) -> Option<TimeSlot> {
        self.inner.load().time_slots_by_id.get(&id).cloned()
    }

    /// Look up a decoration style by id.
    pub fn decoration_style(&self, id: i64) -> Option<DecorationStyle> {
        self.inner.load().decoration_styles_by_id.get(&id).cloned()
    }

    /// Look up an account by id.
    pub fn user(&self, id: i64) -> Option<User> {
        self.inner.load().users_by_id.get(&id).cloned()
    }

    /// Look up an account by username (case-insensitive).
    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .load()
            .users_by_username
            .get(&username.to_lowercase())
            .cloned()
    }

    /// Number of rooms currently loaded.
    pub fn rooms_len(&self) -> usize {
        self.inner.load().rooms.len()
    }

    /// Number of time slots currently loaded (active or not).
    pub fn time_slots_len(&self) -> usize {
        self.inner.load().time_slots.len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
