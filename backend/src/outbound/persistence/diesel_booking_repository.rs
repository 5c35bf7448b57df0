//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! All operations are async via `diesel-async`. The unique indexes on
//! `booking_id` and `idempotency_key` are what make inserts race-safe;
//! this adapter distinguishes the two violations by constraint name so the
//! intake service can pick the right recovery.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    BookingId, BookingRecord, BookingStatus, CargoAddOns, ConfirmationCode, EstimatedCost,
    IdempotencyKey, NewBooking,
};

use super::models::{BookingRow, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    BookingRepositoryError::connection(message)
}

/// Map Diesel errors to domain repository errors.
///
/// Unique violations are routed by constraint name: the idempotency-key
/// index signals a lost submission race, anything else on this table is
/// the booking-id index.
fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => BookingRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => BookingRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or_default();
            if constraint.contains("idempotency") {
                BookingRepositoryError::duplicate_idempotency_key("concurrent insert detected")
            } else {
                BookingRepositoryError::duplicate_booking_id("booking id already allocated")
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BookingRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => BookingRepositoryError::query("database error"),
        _ => BookingRepositoryError::query("database error"),
    }
}

/// Convert a database row into a validated domain booking record.
fn row_to_record(row: BookingRow) -> Result<BookingRecord, BookingRepositoryError> {
    let BookingRow {
        id,
        booking_id,
        confirmation_code,
        cargo_type,
        weight,
        dimensions,
        pickup_address,
        delivery_address,
        pickup_date,
        pickup_time,
        delivery_date,
        service_type,
        insurance,
        packaging,
        loading,
        storage,
        contact_name,
        contact_phone,
        contact_email,
        special_instructions,
        status,
        estimated_cost_cents,
        currency,
        idempotency_key,
        request_id,
        created_at,
        updated_at,
    } = row;

    let booking_id = BookingId::new(booking_id)
        .map_err(|err| BookingRepositoryError::query(err.to_string()))?;
    let confirmation_code = ConfirmationCode::new(confirmation_code)
        .map_err(|err| BookingRepositoryError::query(err.to_string()))?;
    let status: BookingStatus = status
        .parse()
        .map_err(|err: crate::domain::booking::BookingStatusError| {
            BookingRepositoryError::query(err.to_string())
        })?;
    let idempotency_key = idempotency_key
        .map(IdempotencyKey::new)
        .transpose()
        .map_err(|err| BookingRepositoryError::query(err.to_string()))?;

    Ok(BookingRecord {
        sequence_id: id,
        booking_id,
        confirmation_code,
        cargo_type,
        weight,
        dimensions,
        pickup_address,
        delivery_address,
        pickup_date,
        pickup_time,
        delivery_date,
        service_type,
        add_ons: CargoAddOns {
            insurance,
            packaging,
            loading,
            storage,
        },
        contact_name,
        contact_phone,
        contact_email,
        special_instructions,
        status,
        estimated_cost: EstimatedCost::from_cents(estimated_cost_cents),
        currency,
        idempotency_key,
        request_id,
        created_at,
        updated_at,
    })
}

fn booking_to_row(booking: &NewBooking) -> NewBookingRow<'_> {
    NewBookingRow {
        booking_id: booking.booking_id.as_str(),
        confirmation_code: booking.confirmation_code.as_str(),
        cargo_type: booking.cargo_type.as_deref(),
        weight: booking.weight.as_deref(),
        dimensions: booking.dimensions.as_deref(),
        pickup_address: booking.pickup_address.as_str(),
        delivery_address: booking.delivery_address.as_str(),
        pickup_date: booking.pickup_date.as_str(),
        pickup_time: booking.pickup_time.as_deref(),
        delivery_date: booking.delivery_date.as_deref(),
        service_type: booking.service_type.as_deref(),
        insurance: booking.add_ons.insurance,
        packaging: booking.add_ons.packaging,
        loading: booking.add_ons.loading,
        storage: booking.add_ons.storage,
        contact_name: booking.contact_name.as_deref(),
        contact_phone: booking.contact_phone.as_deref(),
        contact_email: booking.contact_email.as_deref(),
        special_instructions: booking.special_instructions.as_deref(),
        status: booking.status.as_str(),
        estimated_cost_cents: booking.estimated_cost.cents(),
        currency: booking.currency.as_str(),
        idempotency_key: booking.idempotency_key.as_ref().map(IdempotencyKey::as_str),
        request_id: booking.request_id.as_deref(),
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: BookingRow = diesel::insert_into(bookings::table)
            .values(booking_to_row(booking))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_record(row)
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .filter(bookings::idempotency_key.eq(key.as_str()))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .filter(bookings::booking_id.eq(booking_id.as_str()))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn delete_older_than(
        &self,
        max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        let cutoff = Utc::now() - max_age;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(bookings::table.filter(bookings::created_at.lt(cutoff)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted as u64)
    }
}
