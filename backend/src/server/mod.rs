//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{BookingIntake, BookingRepository};
use backend::domain::{BookingIntakeService, RetentionSweeper};
use backend::inbound::http::bookings::{get_booking, list_bookings, submit_booking};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DieselBookingRepository, InMemoryBookingRepository};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the intake service and retention handle from configuration.
///
/// Uses the PostgreSQL-backed repository when a pool is configured and
/// falls back to the in-memory store otherwise, so the server stays
/// usable in development without a database.
fn build_booking_ports(
    config: &ServerConfig,
) -> (Arc<dyn BookingIntake>, Arc<dyn BookingRepository>) {
    match &config.db_pool {
        Some(pool) => {
            let repository = Arc::new(DieselBookingRepository::new(pool.clone()));
            let intake = Arc::new(BookingIntakeService::new(Arc::clone(&repository)));
            (intake, repository)
        }
        None => {
            warn!("no database pool configured; using in-memory booking store");
            let repository = Arc::new(InMemoryBookingRepository::new());
            let intake = Arc::new(BookingIntakeService::new(Arc::clone(&repository)));
            (intake, repository)
        }
    }
}

/// Cross-origin policy for the public booking API: any origin, the read
/// and submit methods, and the idempotency/trace headers.
fn booking_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec!["content-type", "x-idempotency-key", "x-request-id"])
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .wrap(booking_cors())
        .service(submit_booking)
        .service(list_bookings)
        .service(get_booking);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Also spawns the retention sweep on the current runtime; the sweep task
/// outlives the returned handle.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let (intake, repository) = build_booking_ports(&config);
    let http_state = web::Data::new(HttpState::new(intake));

    let _retention_task = RetentionSweeper::new(repository, config.retention).spawn();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
