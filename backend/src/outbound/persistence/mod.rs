//! Persistence adapters for the booking repository port.
//!
//! [`DieselBookingRepository`] is the durable PostgreSQL path;
//! [`InMemoryBookingRepository`] mirrors its uniqueness semantics for
//! tests and database-less development. Both are interchangeable behind
//! [`crate::domain::ports::BookingRepository`].

mod diesel_booking_repository;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use memory::InMemoryBookingRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Migrations bundled into the binary at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying pending migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open a synchronous connection for the migration harness.
    #[error("failed to connect for migrations: {0}")]
    Connection(String),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Apply(String),
}

/// Apply all pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built; the migration harness is
/// synchronous by design and the startup path can afford the blocking
/// connection.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| MigrationError::Connection(err.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    Ok(())
}
