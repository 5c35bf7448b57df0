//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/bookings
//! GET  /api/bookings
//! GET  /api/bookings/{booking_id}
//! ```
//!
//! The adapter decodes the wire payload into a domain submission,
//! normalising the quirks clients actually send: numeric weights, separate
//! dimension fields, and empty strings standing in for absent values.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{SubmissionDisposition, SubmitBookingRequest};
use crate::domain::{
    BookingConfirmation, BookingDetail, BookingId, BookingSubmission, BookingSummary, CargoAddOns,
    Error, IdempotencyKey,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Header carrying the client's deduplication token.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";
/// Header carrying the client's tracing token.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fixed acknowledgement message returned with every confirmation.
const ACK_MESSAGE: &str = "Booking received successfully";

/// Weight as submitted: clients send either a string or a bare number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WeightBody {
    /// Weight as a free-form string, e.g. `"2000"`.
    Text(String),
    /// Weight as a JSON number, e.g. `2000`.
    Number(f64),
}

impl WeightBody {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

/// Request payload for creating a booking.
///
/// Every field is optional at the transport layer; the domain validator
/// decides which are required and reports the first violation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitBookingBody {
    pub cargo_type: Option<String>,
    pub weight: Option<WeightBody>,
    pub dimensions: Option<String>,
    /// Separate dimension fields; composed into `LxWxH` when no
    /// `dimensions` string is supplied.
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
    #[schema(example = "2025-06-01")]
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    #[schema(example = "2025-06-03")]
    pub delivery_date: Option<String>,
    pub service_type: Option<String>,
    pub insurance: Option<bool>,
    pub packaging: Option<bool>,
    pub loading: Option<bool>,
    pub storage: Option<bool>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.is_empty())
}

fn compose_dimensions(body: &SubmitBookingBody) -> Option<String> {
    if let Some(dimensions) = none_if_empty(body.dimensions.clone()) {
        return Some(dimensions);
    }
    match (body.length, body.width, body.height) {
        (Some(length), Some(width), Some(height))
            if length != 0.0 && width != 0.0 && height != 0.0 =>
        {
            Some(format!("{length}x{width}x{height}"))
        }
        _ => None,
    }
}

impl From<SubmitBookingBody> for BookingSubmission {
    fn from(body: SubmitBookingBody) -> Self {
        let dimensions = compose_dimensions(&body);
        Self {
            cargo_type: none_if_empty(body.cargo_type),
            weight: none_if_empty(body.weight.map(WeightBody::into_string)),
            dimensions,
            pickup_address: none_if_empty(body.pickup_address),
            delivery_address: none_if_empty(body.delivery_address),
            pickup_date: none_if_empty(body.pickup_date),
            pickup_time: none_if_empty(body.pickup_time),
            delivery_date: none_if_empty(body.delivery_date),
            service_type: none_if_empty(body.service_type),
            add_ons: CargoAddOns {
                insurance: body.insurance.unwrap_or(false),
                packaging: body.packaging.unwrap_or(false),
                loading: body.loading.unwrap_or(false),
                storage: body.storage.unwrap_or(false),
            },
            contact_name: none_if_empty(body.contact_name),
            contact_phone: none_if_empty(body.contact_phone),
            contact_email: none_if_empty(body.contact_email),
            special_instructions: none_if_empty(body.special_instructions),
        }
    }
}

/// Acknowledgement payload returned for fresh creations and replays.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmationBody {
    #[schema(example = "TRE-20250601-042")]
    pub booking_id: String,
    #[schema(example = "CONF-8G2KQZ")]
    pub confirmation_code: String,
    #[schema(example = "pending")]
    pub status: String,
    pub message: String,
    #[schema(example = 300.0)]
    pub estimated_cost: f64,
    #[schema(example = "USD")]
    pub currency: String,
}

impl From<BookingConfirmation> for BookingConfirmationBody {
    fn from(confirmation: BookingConfirmation) -> Self {
        Self {
            booking_id: confirmation.booking_id.to_string(),
            confirmation_code: confirmation.confirmation_code.to_string(),
            status: confirmation.status.to_string(),
            message: ACK_MESSAGE.to_owned(),
            estimated_cost: confirmation.estimated_cost.as_dollars(),
            currency: confirmation.currency,
        }
    }
}

/// Detail payload for the single-booking read.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailBody {
    pub booking_id: String,
    pub confirmation_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub insurance: bool,
    pub packaging: bool,
    pub loading: bool,
    pub storage: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub status: String,
    pub estimated_cost: f64,
    pub currency: String,
    pub created_at: String,
}

impl From<BookingDetail> for BookingDetailBody {
    fn from(detail: BookingDetail) -> Self {
        Self {
            booking_id: detail.booking_id.to_string(),
            confirmation_code: detail.confirmation_code.to_string(),
            cargo_type: detail.cargo_type,
            weight: detail.weight,
            dimensions: detail.dimensions,
            pickup_address: detail.pickup_address,
            delivery_address: detail.delivery_address,
            pickup_date: detail.pickup_date,
            pickup_time: detail.pickup_time,
            delivery_date: detail.delivery_date,
            service_type: detail.service_type,
            insurance: detail.add_ons.insurance,
            packaging: detail.add_ons.packaging,
            loading: detail.add_ons.loading,
            storage: detail.add_ons.storage,
            contact_name: detail.contact_name,
            contact_phone: detail.contact_phone,
            contact_email: detail.contact_email,
            special_instructions: detail.special_instructions,
            status: detail.status.to_string(),
            estimated_cost: detail.estimated_cost.as_dollars(),
            currency: detail.currency,
            created_at: detail.created_at.to_rfc3339(),
        }
    }
}

/// Summary payload for list entries. No contact or instruction fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryBody {
    pub booking_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub insurance: bool,
    pub packaging: bool,
    pub loading: bool,
    pub storage: bool,
    pub status: String,
    pub created_at: String,
}

impl From<BookingSummary> for BookingSummaryBody {
    fn from(summary: BookingSummary) -> Self {
        Self {
            booking_id: summary.booking_id.to_string(),
            cargo_type: summary.cargo_type,
            weight: summary.weight,
            dimensions: summary.dimensions,
            pickup_address: summary.pickup_address,
            delivery_address: summary.delivery_address,
            pickup_date: summary.pickup_date,
            pickup_time: summary.pickup_time,
            delivery_date: summary.delivery_date,
            service_type: summary.service_type,
            insurance: summary.add_ons.insurance,
            packaging: summary.add_ons.packaging,
            loading: summary.add_ons.loading,
            storage: summary.add_ons.storage,
            status: summary.status.to_string(),
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}

/// Listing payload for the collection read.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingListBody {
    pub bookings: Vec<BookingSummaryBody>,
    pub total: usize,
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Submit a booking.
///
/// Fresh submissions answer `201`; a replay under a known idempotency key
/// answers `200` with the identifiers of the original booking.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = SubmitBookingBody,
    responses(
        (status = 201, description = "Booking created", body = BookingConfirmationBody),
        (status = 200, description = "Replayed for a known idempotency key", body = BookingConfirmationBody),
        (status = 400, description = "Validation failure", body = Error),
        (status = 500, description = "Internal error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "submitBooking"
)]
#[post("/bookings")]
pub async fn submit_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<SubmitBookingBody>,
) -> ApiResult<HttpResponse> {
    let idempotency_key = header_value(&req, IDEMPOTENCY_KEY_HEADER)
        .and_then(|raw| IdempotencyKey::new(raw).ok());
    let request_id = header_value(&req, REQUEST_ID_HEADER).filter(|raw| !raw.is_empty());

    let outcome = state
        .bookings
        .submit(SubmitBookingRequest {
            submission: BookingSubmission::from(payload.into_inner()),
            idempotency_key,
            request_id,
        })
        .await?;

    let body = BookingConfirmationBody::from(outcome.confirmation);
    let response = match outcome.disposition {
        SubmissionDisposition::Created => HttpResponse::Created().json(body),
        SubmissionDisposition::Replayed => HttpResponse::Ok().json(body),
    };
    Ok(response)
}

/// List every booking, newest first.
#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "All bookings, newest first", body = BookingListBody),
        (status = 500, description = "Internal error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(state: web::Data<HttpState>) -> ApiResult<web::Json<BookingListBody>> {
    let listing = state.bookings.list().await?;

    Ok(web::Json(BookingListBody {
        total: listing.total,
        bookings: listing
            .bookings
            .into_iter()
            .map(BookingSummaryBody::from)
            .collect(),
    }))
}

/// Fetch a booking by its business identifier.
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "Business booking identifier", example = "TRE-20250601-042")
    ),
    responses(
        (status = 200, description = "Booking detail", body = BookingDetailBody),
        (status = 404, description = "Unknown booking", body = Error),
        (status = 500, description = "Internal error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingDetailBody>> {
    let booking_id = BookingId::new(path.into_inner())
        .map_err(|_| Error::not_found("Booking not found"))?;

    let detail = state.bookings.get(&booking_id).await?;
    Ok(web::Json(BookingDetailBody::from(detail)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn body_from(value: serde_json::Value) -> SubmitBookingBody {
        serde_json::from_value(value).expect("deserializable body")
    }

    #[rstest]
    fn numeric_weight_coerces_to_string() {
        let body = body_from(json!({ "weight": 2000 }));
        let submission = BookingSubmission::from(body);
        assert_eq!(submission.weight.as_deref(), Some("2000"));

        let body = body_from(json!({ "weight": 2000.5 }));
        let submission = BookingSubmission::from(body);
        assert_eq!(submission.weight.as_deref(), Some("2000.5"));
    }

    #[rstest]
    fn string_weight_passes_through() {
        let body = body_from(json!({ "weight": "about 900" }));
        let submission = BookingSubmission::from(body);
        assert_eq!(submission.weight.as_deref(), Some("about 900"));
    }

    #[rstest]
    fn dimensions_compose_from_separate_fields() {
        let body = body_from(json!({ "length": 10, "width": 2, "height": 3 }));
        let submission = BookingSubmission::from(body);
        assert_eq!(submission.dimensions.as_deref(), Some("10x2x3"));
    }

    #[rstest]
    fn explicit_dimensions_win_over_separate_fields() {
        let body = body_from(json!({
            "dimensions": "4x4x4",
            "length": 10, "width": 2, "height": 3
        }));
        let submission = BookingSubmission::from(body);
        assert_eq!(submission.dimensions.as_deref(), Some("4x4x4"));
    }

    #[rstest]
    #[case(json!({ "length": 10, "width": 2 }))]
    #[case(json!({ "length": 10, "width": 2, "height": 0 }))]
    fn incomplete_dimension_fields_are_ignored(#[case] value: serde_json::Value) {
        let submission = BookingSubmission::from(body_from(value));
        assert_eq!(submission.dimensions, None);
    }

    #[rstest]
    fn empty_strings_normalise_to_absent() {
        let body = body_from(json!({
            "cargoType": "",
            "pickupAddress": "1 Main St",
            "deliveryDate": "",
            "contactEmail": ""
        }));
        let submission = BookingSubmission::from(body);

        assert_eq!(submission.cargo_type, None);
        assert_eq!(submission.delivery_date, None);
        assert_eq!(submission.contact_email, None);
        assert_eq!(submission.pickup_address.as_deref(), Some("1 Main St"));
    }

    #[rstest]
    fn add_on_flags_default_to_false() {
        let submission = BookingSubmission::from(body_from(json!({ "insurance": true })));
        assert!(submission.add_ons.insurance);
        assert!(!submission.add_ons.packaging);
        assert!(!submission.add_ons.loading);
        assert!(!submission.add_ons.storage);
    }

    #[rstest]
    fn confirmation_body_carries_ack_message() {
        use crate::domain::{BookingStatus, ConfirmationCode, EstimatedCost};

        let confirmation = BookingConfirmation {
            booking_id: BookingId::new("TRE-20250601-042").expect("valid id"),
            confirmation_code: ConfirmationCode::new("CONF-8G2KQZ").expect("valid code"),
            status: BookingStatus::Pending,
            estimated_cost: EstimatedCost::from_cents(30_000),
            currency: "USD".to_owned(),
        };

        let body = BookingConfirmationBody::from(confirmation);
        assert_eq!(body.message, "Booking received successfully");
        assert_eq!(body.estimated_cost, 300.0);
        assert_eq!(body.status, "pending");
    }
}
