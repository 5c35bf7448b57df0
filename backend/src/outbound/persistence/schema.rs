//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` when migrations
//! change.

diesel::table! {
    /// Booking records, one row per accepted submission.
    ///
    /// `id` is the surrogate primary key; `booking_id` carries the unique
    /// business identifier and `idempotency_key` the unique (when non-null)
    /// deduplication token.
    bookings (id) {
        /// Surrogate primary key, never exposed to clients.
        id -> Int8,
        /// Business identifier, unique.
        booking_id -> Varchar,
        /// Human-facing confirmation code, not necessarily unique.
        confirmation_code -> Varchar,
        cargo_type -> Nullable<Varchar>,
        weight -> Nullable<Varchar>,
        dimensions -> Nullable<Varchar>,
        pickup_address -> Varchar,
        delivery_address -> Varchar,
        /// Calendar date as submitted, `YYYY-MM-DD`.
        pickup_date -> Varchar,
        pickup_time -> Nullable<Varchar>,
        delivery_date -> Nullable<Varchar>,
        service_type -> Nullable<Varchar>,
        insurance -> Bool,
        packaging -> Bool,
        loading -> Bool,
        storage -> Bool,
        contact_name -> Nullable<Varchar>,
        contact_phone -> Nullable<Varchar>,
        contact_email -> Nullable<Varchar>,
        special_instructions -> Nullable<Text>,
        status -> Varchar,
        /// Estimate in integer cents.
        estimated_cost_cents -> Int8,
        currency -> Varchar,
        /// Client deduplication token, unique when non-null.
        idempotency_key -> Nullable<Varchar>,
        /// Client tracing token, stored but never used for logic.
        request_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
