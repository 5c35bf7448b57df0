//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with adapters. The
//! booking repository is the driven side (storage); the booking intake is
//! the driving side consumed by the HTTP adapter. Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants.

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use super::booking::{
    BookingConfirmation, BookingDetail, BookingId, BookingRecord, BookingSubmission,
    BookingSummary, IdempotencyKey, NewBooking,
};
use super::error::Error;

/// Errors surfaced by booking repository adapters.
///
/// The two duplicate variants are load-bearing: the intake service recovers
/// from [`BookingRepositoryError::DuplicateBookingId`] by regenerating the
/// identifier and from [`BookingRepositoryError::DuplicateIdempotencyKey`]
/// by re-fetching the record that won the race.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRepositoryError {
    /// Database connectivity or checkout failures.
    #[error("booking store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("booking store query failed: {message}")]
    Query { message: String },
    /// The generated booking id already exists.
    #[error("duplicate booking id: {message}")]
    DuplicateBookingId { message: String },
    /// Another submission with the same idempotency key was inserted first.
    #[error("duplicate idempotency key: {message}")]
    DuplicateIdempotencyKey { message: String },
}

impl BookingRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for booking-id uniqueness violations.
    pub fn duplicate_booking_id(message: impl Into<String>) -> Self {
        Self::DuplicateBookingId {
            message: message.into(),
        }
    }

    /// Helper for idempotency-key uniqueness violations.
    pub fn duplicate_idempotency_key(message: impl Into<String>) -> Self {
        Self::DuplicateIdempotencyKey {
            message: message.into(),
        }
    }
}

/// Persistence port for booking records.
///
/// Implementations must enforce uniqueness of `booking_id` and of non-null
/// `idempotency_key` at insert time; the intake service's race recovery
/// depends on the constraint, not on a prior lookup.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking, returning the stored record with its
    /// store-assigned surrogate key and timestamps.
    async fn insert(&self, booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError>;

    /// Fetch the booking created under the given idempotency key, if any.
    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError>;

    /// Fetch a booking by its business identifier.
    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError>;

    /// List every booking, newest first.
    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError>;

    /// Delete bookings older than the given age. Idempotent; returns the
    /// number of rows removed.
    async fn delete_older_than(
        &self,
        max_age: Duration,
    ) -> Result<u64, BookingRepositoryError>;
}

/// Inbound submission handed to the intake service by a transport adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitBookingRequest {
    /// Raw field bag after transport decoding.
    pub submission: BookingSubmission,
    /// Deduplication token from the `X-Idempotency-Key` header.
    pub idempotency_key: Option<IdempotencyKey>,
    /// Tracing token from the `X-Request-Id` header; stored, never used for
    /// logic.
    pub request_id: Option<String>,
}

/// Whether a submission created a booking or replayed an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionDisposition {
    /// A new booking was persisted.
    Created,
    /// An existing booking for the same idempotency key was returned.
    Replayed,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitBookingOutcome {
    /// Acknowledgement projection returned to the client.
    pub confirmation: BookingConfirmation,
    /// Fresh creation or idempotent replay.
    pub disposition: SubmissionDisposition,
}

impl SubmitBookingOutcome {
    /// Outcome for a freshly persisted booking.
    pub fn created(confirmation: BookingConfirmation) -> Self {
        Self {
            confirmation,
            disposition: SubmissionDisposition::Created,
        }
    }

    /// Outcome replayed from the record that already holds the key.
    pub fn replayed(confirmation: BookingConfirmation) -> Self {
        Self {
            confirmation,
            disposition: SubmissionDisposition::Replayed,
        }
    }
}

/// Listing of every booking, newest first, with its total count.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingList {
    pub bookings: Vec<BookingSummary>,
    pub total: usize,
}

/// Driving port consumed by transport adapters.
#[async_trait]
pub trait BookingIntake: Send + Sync {
    /// Run a submission through validation, deduplication, derivation, and
    /// persistence.
    async fn submit(&self, request: SubmitBookingRequest) -> Result<SubmitBookingOutcome, Error>;

    /// Fetch the detail projection for a booking.
    async fn get(&self, booking_id: &BookingId) -> Result<BookingDetail, Error>;

    /// List summary projections for every booking, newest first.
    async fn list(&self) -> Result<BookingList, Error>;
}
