//! DevEvent application library
//!
//! Event and booking modules, plus the shared validation errors, mounted on
//! the DevEvent kernel.

pub mod modules;
pub mod validation;

pub use modules::bookings::{models::Booking, store::BookingStore};
pub use modules::events::{models::Event, store::EventStore};
pub use modules::register_all;
pub use validation::ValidationError;
