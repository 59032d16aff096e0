//! Server-rendered views (askama templates).

use askama::Template;

use common::model::{Booking, DecorationStyle, Room, TimeSlot};

use crate::catalog::CatalogStore;
use crate::flash::FlashMessage;

/// One booking as shown in lists and on the payment page.
pub struct BookingRow {
    pub id: i64,
    pub room_name: String,
    pub slot_label: String,
    pub style_name: String,
    pub booking_date: String,
    pub status: String,
    pub paid: bool,
}

impl BookingRow {
    /// Resolve catalog names for display. Entries that have since left the
    /// catalog render as `"?"` rather than dropping the booking.
    pub fn from_booking(catalog: &CatalogStore, booking: &Booking) -> Self {
        let room_name = catalog
            .room(booking.room_id)
            .map(|r| r.name)
            .unwrap_or_else(|| "?".into());
        let slot_label = catalog
            .time_slot(booking.time_slot_id)
            .map(|t| t.label)
            .unwrap_or_else(|| "?".into());
        let style_name = catalog
            .decoration_style(booking.decoration_style_id)
            .map(|d| d.name)
            .unwrap_or_else(|| "?".into());
        Self {
            id: booking.id,
            room_name,
            slot_label,
            style_name,
            booking_date: booking.booking_date.to_string(),
            status: booking.status.to_string(),
            paid: booking.payment_info.is_some(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub flash: Option<FlashMessage>,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<FlashMessage>,
}

#[derive(Template)]
#[template(path = "select_timeslot.html")]
pub struct SelectTimeslotTemplate {
    pub flash: Option<FlashMessage>,
    pub rooms: Vec<Room>,
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Template)]
#[template(path = "select_decoration.html")]
pub struct SelectDecorationTemplate {
    pub room: Room,
    pub time_slot: TimeSlot,
    pub booking_date: String,
    pub decoration_styles: Vec<DecorationStyle>,
}

#[derive(Template)]
#[template(path = "bookings.html")]
pub struct BookingsTemplate {
    pub flash: Option<FlashMessage>,
    pub display_name: String,
    pub bookings: Vec<BookingRow>,
}

#[derive(Template)]
#[template(path = "payment.html")]
pub struct PaymentTemplate {
    pub booking: BookingRow,
    pub amount: f64,
    pub bank_account: String,
    pub bank_name: String,
}
