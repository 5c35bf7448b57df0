//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::bookings;

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub booking_id: String,
    pub confirmation_code: String,
    pub cargo_type: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub insurance: bool,
    pub packaging: bool,
    pub loading: bool,
    pub storage: bool,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
    pub status: String,
    pub estimated_cost_cents: i64,
    pub currency: String,
    pub idempotency_key: Option<String>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new booking records.
///
/// The surrogate id, timestamps, and column defaults are assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub booking_id: &'a str,
    pub confirmation_code: &'a str,
    pub cargo_type: Option<&'a str>,
    pub weight: Option<&'a str>,
    pub dimensions: Option<&'a str>,
    pub pickup_address: &'a str,
    pub delivery_address: &'a str,
    pub pickup_date: &'a str,
    pub pickup_time: Option<&'a str>,
    pub delivery_date: Option<&'a str>,
    pub service_type: Option<&'a str>,
    pub insurance: bool,
    pub packaging: bool,
    pub loading: bool,
    pub storage: bool,
    pub contact_name: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub special_instructions: Option<&'a str>,
    pub status: &'a str,
    pub estimated_cost_cents: i64,
    pub currency: &'a str,
    pub idempotency_key: Option<&'a str>,
    pub request_id: Option<&'a str>,
}
