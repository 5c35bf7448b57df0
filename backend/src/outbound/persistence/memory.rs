//! In-memory `BookingRepository` implementation.
//!
//! Honours the same uniqueness semantics as the PostgreSQL adapter so the
//! intake service's conflict-recovery paths behave identically. Serves the
//! test suites and the no-database development fallback; data does not
//! survive a restart.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{BookingId, BookingRecord, IdempotencyKey, NewBooking};

#[derive(Default)]
struct MemoryState {
    next_sequence_id: i64,
    records: Vec<BookingRecord>,
}

/// Mutex-guarded booking store.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryBookingRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, BookingRepositoryError> {
        self.state
            .lock()
            .map_err(|_| BookingRepositoryError::query("booking store lock poisoned"))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        let mut state = self.lock()?;

        if state
            .records
            .iter()
            .any(|record| record.booking_id == booking.booking_id)
        {
            return Err(BookingRepositoryError::duplicate_booking_id(
                booking.booking_id.as_str(),
            ));
        }
        if let Some(key) = booking.idempotency_key.as_ref() {
            if state
                .records
                .iter()
                .any(|record| record.idempotency_key.as_ref() == Some(key))
            {
                return Err(BookingRepositoryError::duplicate_idempotency_key(
                    key.as_str(),
                ));
            }
        }

        state.next_sequence_id += 1;
        let now = Utc::now();
        let record = BookingRecord {
            sequence_id: state.next_sequence_id,
            booking_id: booking.booking_id.clone(),
            confirmation_code: booking.confirmation_code.clone(),
            cargo_type: booking.cargo_type.clone(),
            weight: booking.weight.clone(),
            dimensions: booking.dimensions.clone(),
            pickup_address: booking.pickup_address.clone(),
            delivery_address: booking.delivery_address.clone(),
            pickup_date: booking.pickup_date.clone(),
            pickup_time: booking.pickup_time.clone(),
            delivery_date: booking.delivery_date.clone(),
            service_type: booking.service_type.clone(),
            add_ons: booking.add_ons,
            contact_name: booking.contact_name.clone(),
            contact_phone: booking.contact_phone.clone(),
            contact_email: booking.contact_email.clone(),
            special_instructions: booking.special_instructions.clone(),
            status: booking.status,
            estimated_cost: booking.estimated_cost,
            currency: booking.currency.clone(),
            idempotency_key: booking.idempotency_key.clone(),
            request_id: booking.request_id.clone(),
            created_at: now,
            updated_at: now,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .find(|record| record.idempotency_key.as_ref() == Some(key))
            .cloned())
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .find(|record| &record.booking_id == booking_id)
            .cloned())
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        let state = self.lock()?;
        let mut records = state.records.clone();
        // Sequence id breaks ties between equal timestamps.
        records.sort_by(|a, b| {
            (b.created_at, b.sequence_id).cmp(&(a.created_at, a.sequence_id))
        });
        Ok(records)
    }

    async fn delete_older_than(
        &self,
        max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        let cutoff = Utc::now() - max_age;
        let mut state = self.lock()?;
        let before = state.records.len();
        state.records.retain(|record| record.created_at >= cutoff);
        Ok((before - state.records.len()) as u64)
    }
}
