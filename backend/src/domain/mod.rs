//! Booking domain: aggregates, pure derivations, and ports.
//!
//! Purpose: hold the intake pipeline's contracts free of transport and
//! storage concerns. Inbound adapters consume [`ports::BookingIntake`];
//! outbound adapters implement [`ports::BookingRepository`]. Everything
//! else here is a pure function or an immutable value type.

pub mod booking;
pub mod error;
pub mod identifier;
pub mod intake;
pub mod ports;
pub mod pricing;
pub mod retention;
pub mod validation;

pub use self::booking::{
    BookingConfirmation, BookingDetail, BookingId, BookingIdError, BookingRecord, BookingStatus,
    BookingSubmission, BookingSummary, CURRENCY, CargoAddOns, ConfirmationCode, EstimatedCost,
    IdempotencyKey, IdempotencyKeyError, NewBooking,
};
pub use self::error::{Error, ErrorCode, ErrorDetails};
pub use self::identifier::{generate_booking_id, generate_confirmation_code};
pub use self::intake::BookingIntakeService;
pub use self::pricing::estimate_cost;
pub use self::retention::{RetentionPolicy, RetentionSweeper};
pub use self::validation::{ValidationFailure, validate_submission};
