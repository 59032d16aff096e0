//! [`BookingStore`]: in-memory registry of bookings.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use dashmap::DashMap;
use thiserror::Error;
use time::{Date, OffsetDateTime};

use common::model::{Booking, BookingStatus};

/// Errors produced by the booking layer.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The room already has a live booking for this slot and date.
    #[error("room {room_id} is already booked for slot {time_slot_id} on {booking_date}")]
    Conflict {
        room_id: i64,
        time_slot_id: i64,
        booking_date: Date,
    },
}

/// Thread-safe store of bookings with sequential id allocation.
#[derive(Clone, Debug)]
pub struct BookingStore {
    bookings: Arc<DashMap<i64, Booking>>,
    next_id: Arc<AtomicI64>,
}

impl BookingStore {
    /// Create a new, empty [`BookingStore`].
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Create a booking in `PENDING` state.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Conflict`] if the room already has a
    /// non-cancelled booking for the same slot and date.
    pub fn create(
        &self,
        user_id: i64,
        room_id: i64,
        time_slot_id: i64,
        decoration_style_id: i64,
        booking_date: Date,
    ) -> Result<Booking, BookingError> {
        let taken = self.bookings.iter().any(|entry| {
            let b = entry.value();
            b.room_id == room_id
                && b.time_slot_id == time_slot_id
                && b.booking_date == booking_date
                && !b.status.is_cancelled()
        });
        if taken {
            return Err(BookingError::Conflict {
                room_id,
                time_slot_id,
                booking_date,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let booking = Booking {
            id,
            user_id,
            room_id,
            time_slot_id,
            decoration_style_id,
            booking_date,
            status: BookingStatus::Pending,
            payment_info: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    /// Look up a booking by id.
    pub fn get(&self, id: i64) -> Option<Booking> {
        self.bookings.get(&id).map(|b| b.clone())
    }

    /// All bookings owned by `user_id`, newest first.
    pub fn for_user(&self, user_id: i64) -> Vec<Booking> {
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by(|a, b| b.id.cmp(&a.id));
        out
    }

    /// Set the status of a booking. Returns `false` if the id is unknown.
    pub fn set_status(&self, id: i64, status: BookingStatus) -> bool {
        match self.bookings.get_mut(&id) {
            Some(mut b) => {
                b.status = status;
                true
            }
            None => false,
        }
    }

    /// Record a payment reference on a booking. Returns `false` if the id is
    /// unknown.
    pub fn record_payment(&self, id: i64, payment_info: &str) -> bool {
        match self.bookings.get_mut(&id) {
            Some(mut b) => {
                b.payment_info = Some(payment_info.to_owned());
                true
            }
            None => false,
        }
    }

    /// Number of bookings held.
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Returns `true` if no bookings are held.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}
