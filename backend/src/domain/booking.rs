//! Booking aggregate and its projections.
//!
//! A [`BookingRecord`] is immutable once persisted: the intake service
//! creates it exactly once and the core exposes no mutation path. The three
//! projection types mirror the read contexts of the HTTP surface:
//! confirmation (submission response), detail (single read), and summary
//! (list read, no contact or instruction fields).

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Currency applied to every estimate.
pub const CURRENCY: &str = "USD";

/// Business-facing booking identifier, e.g. `TRE-20250601-042`.
///
/// Globally unique by store constraint, assigned once at creation and never
/// reused. The surrogate row id stays internal to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookingId(String);

impl BookingId {
    /// Construct a booking identifier from client input.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::BookingId;
    ///
    /// let id = BookingId::new("TRE-20250601-042").expect("valid id");
    /// assert_eq!(id.as_str(), "TRE-20250601-042");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, BookingIdError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(BookingIdError::Blank);
        }
        Ok(Self(raw))
    }

    /// Wrap an identifier produced by the generator, which is never blank.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for BookingId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`BookingId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingIdError {
    /// Identifier is empty after trimming whitespace.
    #[error("booking id must not be blank")]
    Blank,
}

/// Secondary human-facing confirmation code, e.g. `CONF-8G2KQZ`.
///
/// Not required to be unique; collisions are an accepted risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Construct a confirmation code from stored input.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfirmationCodeError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ConfirmationCodeError::Blank);
        }
        Ok(Self(raw))
    }

    /// Wrap a code produced by the generator, which is never blank.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing [`ConfirmationCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationCodeError {
    /// Code is empty after trimming whitespace.
    #[error("confirmation code must not be blank")]
    Blank,
}

/// Client-supplied token identifying a logical submission attempt.
///
/// When present, the store admits at most one booking per key; repeated use
/// replays the original response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Construct a key from a request header, trimming surrounding
    /// whitespace and rejecting blank values.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::IdempotencyKey;
    ///
    /// let key = IdempotencyKey::new("abc-1").expect("valid key");
    /// assert_eq!(key.as_str(), "abc-1");
    /// assert!(IdempotencyKey::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, IdempotencyKeyError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdempotencyKeyError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing [`IdempotencyKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdempotencyKeyError {
    /// Key is empty after trimming whitespace.
    #[error("idempotency key must not be blank")]
    Blank,
}

/// Estimated price in integer cents.
///
/// The estimator guarantees the value never falls below the minimum charge
/// floor; keeping cents as an integer avoids drift in stored amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EstimatedCost(i64);

impl EstimatedCost {
    /// Wrap an amount expressed in cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Amount in dollars, as serialized on the wire.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EstimatedCost;
    ///
    /// assert_eq!(EstimatedCost::from_cents(30_000).as_dollars(), 300.0);
    /// ```
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Lifecycle status of a booking.
///
/// The core creates every booking as [`BookingStatus::Pending`] and contains
/// no transition logic; status changes happen outside this pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum BookingStatus {
    /// Initial state of every accepted submission.
    #[default]
    Pending,
}

impl BookingStatus {
    /// Stable string form used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = BookingStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            other => Err(BookingStatusError::Unknown {
                value: other.to_owned(),
            }),
        }
    }
}

/// Errors returned when decoding a stored status value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingStatusError {
    /// The stored value matches no known status.
    #[error("unknown booking status: {value}")]
    Unknown { value: String },
}

/// Optional service add-ons from the extended submission variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CargoAddOns {
    pub insurance: bool,
    pub packaging: bool,
    pub loading: bool,
    pub storage: bool,
}

/// Raw client submission after transport decoding.
///
/// Every field is captured as submitted; the validator decides which are
/// required. Empty strings are normalised to `None` by the inbound adapter
/// before the submission reaches the domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingSubmission {
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub add_ons: CargoAddOns,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
}

/// Fully derived booking ready for insertion.
///
/// Produced by the intake service from a validated submission plus the
/// generated identifiers and the computed estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub booking_id: BookingId,
    pub confirmation_code: ConfirmationCode,
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub add_ons: CargoAddOns,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub estimated_cost: EstimatedCost,
    pub currency: String,
    pub idempotency_key: Option<IdempotencyKey>,
    pub request_id: Option<String>,
}

/// Persisted booking as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    /// Store-assigned surrogate key; never exposed as a business identifier.
    pub sequence_id: i64,
    pub booking_id: BookingId,
    pub confirmation_code: ConfirmationCode,
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub add_ons: CargoAddOns,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub estimated_cost: EstimatedCost,
    pub currency: String,
    pub idempotency_key: Option<IdempotencyKey>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Response projection returned for fresh creations and replays alike.
    pub fn confirmation(&self) -> BookingConfirmation {
        BookingConfirmation {
            booking_id: self.booking_id.clone(),
            confirmation_code: self.confirmation_code.clone(),
            status: self.status,
            estimated_cost: self.estimated_cost,
            currency: self.currency.clone(),
        }
    }

    /// Full projection served by the single-booking read.
    pub fn detail(&self) -> BookingDetail {
        BookingDetail {
            booking_id: self.booking_id.clone(),
            confirmation_code: self.confirmation_code.clone(),
            cargo_type: self.cargo_type.clone(),
            weight: self.weight.clone(),
            dimensions: self.dimensions.clone(),
            pickup_address: self.pickup_address.clone(),
            delivery_address: self.delivery_address.clone(),
            pickup_date: self.pickup_date.clone(),
            pickup_time: self.pickup_time.clone(),
            delivery_date: self.delivery_date.clone(),
            service_type: self.service_type.clone(),
            add_ons: self.add_ons,
            contact_name: self.contact_name.clone(),
            contact_phone: self.contact_phone.clone(),
            contact_email: self.contact_email.clone(),
            special_instructions: self.special_instructions.clone(),
            status: self.status,
            estimated_cost: self.estimated_cost,
            currency: self.currency.clone(),
            created_at: self.created_at,
        }
    }

    /// Reduced projection served by the list read.
    ///
    /// Omits contact fields and special instructions.
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            booking_id: self.booking_id.clone(),
            cargo_type: self.cargo_type.clone(),
            weight: self.weight.clone(),
            dimensions: self.dimensions.clone(),
            pickup_address: self.pickup_address.clone(),
            delivery_address: self.delivery_address.clone(),
            pickup_date: self.pickup_date.clone(),
            pickup_time: self.pickup_time.clone(),
            delivery_date: self.delivery_date.clone(),
            service_type: self.service_type.clone(),
            add_ons: self.add_ons,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Acknowledgement projection for `POST /bookings` responses.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
    pub confirmation_code: ConfirmationCode,
    pub status: BookingStatus,
    pub estimated_cost: EstimatedCost,
    pub currency: String,
}

/// Detail projection for `GET /bookings/{bookingId}` responses.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetail {
    pub booking_id: BookingId,
    pub confirmation_code: ConfirmationCode,
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub add_ons: CargoAddOns,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub estimated_cost: EstimatedCost,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Summary projection for `GET /bookings` responses.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummary {
    pub booking_id: BookingId,
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub add_ons: CargoAddOns,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn booking_id_rejects_blank(#[case] value: &str) {
        assert_eq!(BookingId::new(value), Err(BookingIdError::Blank));
    }

    #[rstest]
    fn idempotency_key_trims_surrounding_whitespace() {
        let key = IdempotencyKey::new("  abc-1  ").expect("valid key");
        assert_eq!(key.as_str(), "abc-1");
    }

    #[rstest]
    fn estimated_cost_converts_to_dollars() {
        assert_eq!(EstimatedCost::from_cents(12_345).as_dollars(), 123.45);
    }

    #[rstest]
    fn status_round_trips_through_storage_form() {
        let status: BookingStatus = "pending".parse().expect("known status");
        assert_eq!(status, BookingStatus::Pending);
        assert_eq!(status.as_str(), "pending");
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let err = "shipped".parse::<BookingStatus>().expect_err("unknown");
        assert!(err.to_string().contains("shipped"));
    }
}
