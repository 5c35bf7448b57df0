//! HTTP adapter: handlers, state, and error mapping.

pub mod bookings;
pub mod error;
pub mod health;
pub mod state;

use crate::domain::Error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;
