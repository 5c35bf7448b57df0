//! Booking intake orchestration.
//!
//! The service runs each submission through validation, idempotency
//! deduplication, identifier generation, cost estimation, and persistence.
//! Uniqueness is enforced by the store, not by the pre-insert lookup: a
//! submission that loses an idempotency race recovers by re-fetching the
//! winning record, and a booking-id collision recovers by regenerating the
//! identifier a bounded number of times.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, warn};

use super::booking::{
    BookingDetail, BookingId, BookingStatus, BookingSubmission, CURRENCY, EstimatedCost,
    IdempotencyKey, NewBooking,
};
use super::error::Error;
use super::identifier::{generate_booking_id, generate_confirmation_code};
use super::ports::{
    BookingIntake, BookingList, BookingRepository, BookingRepositoryError, SubmitBookingOutcome,
    SubmitBookingRequest,
};
use super::pricing::estimate_cost;
use super::validation::validate_submission;

/// Upper bound on booking-id regeneration after store collisions.
///
/// The random segment spans 001–999 per calendar day, so collisions are
/// expected under load; exhausting the attempts means the day's id space is
/// effectively saturated.
const MAX_BOOKING_ID_ATTEMPTS: u32 = 5;

/// Concrete implementation of [`BookingIntake`].
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use backend::domain::BookingIntakeService;
/// use backend::outbound::persistence::InMemoryBookingRepository;
///
/// let service = BookingIntakeService::new(Arc::new(InMemoryBookingRepository::new()));
/// let _service = service;
/// ```
pub struct BookingIntakeService<S> {
    repository: Arc<S>,
}

impl<S> BookingIntakeService<S>
where
    S: BookingRepository,
{
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    fn build_new_booking(
        submission: &BookingSubmission,
        idempotency_key: Option<&IdempotencyKey>,
        request_id: Option<&str>,
        estimated_cost: EstimatedCost,
    ) -> NewBooking {
        let (booking_id, confirmation_code) = {
            // ThreadRng is not Send; keep it out of scope across awaits.
            let mut rng = rand::thread_rng();
            (
                generate_booking_id(Utc::now().date_naive(), &mut rng),
                generate_confirmation_code(&mut rng),
            )
        };

        NewBooking {
            booking_id,
            confirmation_code,
            cargo_type: submission.cargo_type.clone(),
            weight: submission.weight.clone(),
            dimensions: submission.dimensions.clone(),
            // Validation has already established the required fields.
            pickup_address: submission.pickup_address.clone().unwrap_or_default(),
            delivery_address: submission.delivery_address.clone().unwrap_or_default(),
            pickup_date: submission.pickup_date.clone().unwrap_or_default(),
            pickup_time: submission.pickup_time.clone(),
            delivery_date: submission.delivery_date.clone(),
            service_type: submission.service_type.clone(),
            add_ons: submission.add_ons,
            contact_name: submission.contact_name.clone(),
            contact_phone: submission.contact_phone.clone(),
            contact_email: submission.contact_email.clone(),
            special_instructions: submission.special_instructions.clone(),
            status: BookingStatus::Pending,
            estimated_cost,
            currency: CURRENCY.to_owned(),
            idempotency_key: idempotency_key.cloned(),
            request_id: request_id.map(str::to_owned),
        }
    }

    /// Re-fetch the record that won an idempotency race and replay it.
    async fn replay_race_winner(
        &self,
        key: &IdempotencyKey,
    ) -> Result<SubmitBookingOutcome, Error> {
        let existing = self
            .repository
            .find_by_idempotency_key(key)
            .await
            .map_err(map_repository_error)?;

        match existing {
            Some(record) => {
                debug!(
                    idempotency_key = %key,
                    booking_id = %record.booking_id,
                    "lost idempotency race, replaying winning booking"
                );
                Ok(SubmitBookingOutcome::replayed(record.confirmation()))
            }
            None => {
                // The winner's record vanished between our insert attempt and
                // the retry lookup; only the retention sweep could do that.
                Err(Error::internal(
                    "booking for winning idempotency key disappeared during race resolution",
                ))
            }
        }
    }
}

/// Map repository errors to domain errors.
fn map_repository_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            error!(%message, "booking store unavailable");
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            error!(%message, "booking store query failed");
            Error::internal(format!("booking store error: {message}"))
        }
        BookingRepositoryError::DuplicateBookingId { message }
        | BookingRepositoryError::DuplicateIdempotencyKey { message } => {
            // Duplicates are recovered where they occur; reaching here means
            // the recovery path itself conflicted.
            Error::internal(format!("unexpected duplicate during recovery: {message}"))
        }
    }
}

#[async_trait]
impl<S> BookingIntake for BookingIntakeService<S>
where
    S: BookingRepository,
{
    async fn submit(&self, request: SubmitBookingRequest) -> Result<SubmitBookingOutcome, Error> {
        let SubmitBookingRequest {
            submission,
            idempotency_key,
            request_id,
        } = request;

        validate_submission(&submission)?;

        if let Some(key) = idempotency_key.as_ref() {
            let existing = self
                .repository
                .find_by_idempotency_key(key)
                .await
                .map_err(map_repository_error)?;
            if let Some(record) = existing {
                debug!(
                    idempotency_key = %key,
                    booking_id = %record.booking_id,
                    "replaying booking for known idempotency key"
                );
                return Ok(SubmitBookingOutcome::replayed(record.confirmation()));
            }
        }

        let estimated_cost = estimate_cost(submission.weight.as_deref());

        for _ in 0..MAX_BOOKING_ID_ATTEMPTS {
            let booking = Self::build_new_booking(
                &submission,
                idempotency_key.as_ref(),
                request_id.as_deref(),
                estimated_cost,
            );

            match self.repository.insert(&booking).await {
                Ok(record) => {
                    debug!(booking_id = %record.booking_id, "booking persisted");
                    return Ok(SubmitBookingOutcome::created(record.confirmation()));
                }
                Err(BookingRepositoryError::DuplicateBookingId { .. }) => {
                    debug!(
                        booking_id = %booking.booking_id,
                        "booking id collision, regenerating"
                    );
                }
                Err(BookingRepositoryError::DuplicateIdempotencyKey { .. }) => {
                    let Some(key) = idempotency_key.as_ref() else {
                        return Err(Error::internal(
                            "idempotency conflict reported for a keyless submission",
                        ));
                    };
                    return self.replay_race_winner(key).await;
                }
                Err(other) => return Err(map_repository_error(other)),
            }
        }

        warn!("exhausted booking id generation attempts");
        Err(Error::internal("could not allocate a unique booking id"))
    }

    async fn get(&self, booking_id: &BookingId) -> Result<BookingDetail, Error> {
        let record = self
            .repository
            .find_by_booking_id(booking_id)
            .await
            .map_err(map_repository_error)?;

        record
            .map(|found| found.detail())
            .ok_or_else(|| Error::not_found("Booking not found"))
    }

    async fn list(&self) -> Result<BookingList, Error> {
        let records = self
            .repository
            .list_recent_first()
            .await
            .map_err(map_repository_error)?;

        let bookings: Vec<_> = records.iter().map(super::BookingRecord::summary).collect();
        Ok(BookingList {
            total: bookings.len(),
            bookings,
        })
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
