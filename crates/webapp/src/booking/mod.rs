//! Booking creation, validation, and status lifecycle.
//!
//! # Lifecycle
//!
//! 1. A booking is created `PENDING` once the requested room, time slot, and
//!    decoration style all resolve and the requested date/slot has not
//!    already started.
//! 2. The payment page shows bank-transfer instructions; confirming payment
//!    records the transfer reference on the booking.
//! 3. Staff confirm or the user cancels; both are plain status updates.
//!
//! The store refuses to double-book: one non-cancelled booking per
//! room/slot/date.

pub mod store;

pub use store::{BookingError, BookingStore};

use common::model::TimeSlot;
use time::{macros::format_description, Date, OffsetDateTime, PrimitiveDateTime};

/// Wire format of the `bookingDate` parameter, e.g. `2026-09-20`.
const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse a `bookingDate` parameter. Returns `None` for anything that is not
/// a calendar date in `[year]-[month]-[day]` form.
pub fn parse_booking_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// Returns `true` if the slot on `booking_date` starts after the current time.
pub fn is_valid_booking_time(slot: &TimeSlot, booking_date: Date) -> bool {
    is_valid_booking_time_at(slot, booking_date, OffsetDateTime::now_utc())
}

/// [`is_valid_booking_time`] against an explicit `now`.
pub fn is_valid_booking_time_at(
    slot: &TimeSlot,
    booking_date: Date,
    now: OffsetDateTime,
) -> bool {
    let Some(start) = slot.start_time() else {
        return false;
    };
    PrimitiveDateTime::new(booking_date, start).assume_utc() > now
}
