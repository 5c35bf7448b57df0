//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend
//! only on the domain's intake port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::BookingIntake;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Booking intake port serving writes and reads.
    pub bookings: Arc<dyn BookingIntake>,
}

impl HttpState {
    /// Construct state over an intake implementation.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::BookingIntakeService;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::persistence::InMemoryBookingRepository;
    ///
    /// let service = BookingIntakeService::new(Arc::new(InMemoryBookingRepository::new()));
    /// let state = HttpState::new(Arc::new(service));
    /// let _bookings = state.bookings.clone();
    /// ```
    pub fn new(bookings: Arc<dyn BookingIntake>) -> Self {
        Self { bookings }
    }
}
