//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! the booking endpoints from the inbound layer, the health probes, and
//! the wire schemas they reference. Swagger UI serves the document in
//! debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, ErrorDetails};
use crate::inbound::http::bookings::{
    BookingConfirmationBody, BookingDetailBody, BookingListBody, BookingSummaryBody,
    SubmitBookingBody, WeightBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Freight booking API",
        description = "Booking intake pipeline: idempotent submission plus list and detail reads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::bookings::submit_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SubmitBookingBody,
        WeightBody,
        BookingConfirmationBody,
        BookingDetailBody,
        BookingSummaryBody,
        BookingListBody,
        Error,
        ErrorCode,
        ErrorDetails,
    )),
    tags(
        (name = "bookings", description = "Booking intake and reads"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
