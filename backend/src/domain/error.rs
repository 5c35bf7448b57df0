//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the domain only guarantees a stable machine-readable code, a
//! human message, and optional field-level detail.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The submission is malformed or fails a validation rule.
    ValidationError,
    /// The requested booking does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// A dependency (the booking store) is temporarily unavailable.
    ServiceUnavailable,
    /// The HTTP method is not supported on this route.
    MethodNotAllowed,
    /// An unexpected error occurred inside the pipeline.
    ServerError,
}

/// Field-level context attached to validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Name of the offending submission field, as spelled on the wire.
    #[schema(example = "pickupDate")]
    pub field: String,
    /// Human guidance for correcting the field.
    #[schema(example = "Pickup date is required")]
    pub message: String,
}

/// Domain error payload.
///
/// Serializes to the wire envelope `{error, code, details?}` shared by every
/// failure response.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Booking not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[serde(rename = "error")]
    #[schema(example = "Missing required field: pickupDate")]
    message: String,
    #[schema(example = "VALIDATION_ERROR")]
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<ErrorDetails>,
}

impl Error {
    /// Create a new error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level detail, present on validation failures.
    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    /// Attach field-level detail to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    ///
    /// let err = Error::validation("Missing required field: pickupDate")
    ///     .with_field_detail("pickupDate", "Pickup date is required");
    /// assert_eq!(err.details().map(|d| d.field.as_str()), Some("pickupDate"));
    /// ```
    pub fn with_field_detail(
        mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.details = Some(ErrorDetails {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::MethodNotAllowed`].
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotAllowed, message)
    }

    /// Convenience constructor for [`ErrorCode::ServerError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServerError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
