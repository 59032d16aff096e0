//! Shared domain model and catalog file format for the `venuebook` crates.

pub mod catalog;
pub mod model;

pub use model::{Booking, BookingStatus, DecorationStyle, Room, TimeSlot, User};
