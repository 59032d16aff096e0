//! Domain entities for the room-booking application.
//!
//! These types are owned by the stores in the `webapp` crate; the controller
//! layer only reads them and passes identifiers through.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

/// Lifecycle states of a [`Booking`].
///
/// Serialised in SCREAMING_SNAKE_CASE, matching the wire values the rest of
/// the system (admin tooling, exports) expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created and awaiting payment.
    Pending,
    /// Payment verified by staff.
    Confirmed,
    /// Cancelled by the booking's owner.
    CancelledByUser,
    /// Cancelled by an administrator.
    CancelledByAdmin,
    /// The booked slot has passed and the booking was honoured.
    Completed,
}

impl BookingStatus {
    /// Returns `true` for either cancellation state.
    pub fn is_cancelled(self) -> bool {
        matches!(
            self,
            BookingStatus::CancelledByUser | BookingStatus::CancelledByAdmin
        )
    }

    /// Wire/display label, e.g. `"CANCELLED_BY_USER"`.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CancelledByUser => "CANCELLED_BY_USER",
            BookingStatus::CancelledByAdmin => "CANCELLED_BY_ADMIN",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation of a room for a time slot on a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Sequentially allocated identifier.
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub time_slot_id: i64,
    pub decoration_style_id: i64,
    /// The calendar date being booked.
    pub booking_date: Date,
    pub status: BookingStatus,
    /// Free-form transfer reference recorded at payment confirmation.
    pub payment_info: Option<String>,
    pub created_at: OffsetDateTime,
}

/// A bookable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: u32,
    pub description: String,
    /// Price per booking, in the site currency.
    pub price: f64,
}

/// A bookable interval offered for every room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: i64,
    /// Human-readable label, e.g. `"08:00 - 12:00"`.
    pub label: String,
    pub start_hour: u8,
    pub start_minute: u8,
    /// Inactive slots are hidden from listings but stay resolvable by id.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_active() -> bool {
    true
}

impl TimeSlot {
    /// Start-of-slot time of day, if the stored hour/minute are in range.
    pub fn start_time(&self) -> Option<Time> {
        Time::from_hms(self.start_hour, self.start_minute, 0).ok()
    }
}

/// A decoration style applied to a booked room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorationStyle {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// A registered account.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Lowercase hex SHA-256 digest of the account password.
    pub password_sha256: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print credential material — not even in debug builds.
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password_sha256", &"[REDACTED]")
            .finish()
    }
}
