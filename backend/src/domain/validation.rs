//! Submission validation rules.
//!
//! First failing rule wins and short-circuits; the failure names the exact
//! wire field so clients can highlight the offending input. Dates are only
//! checked for shape (`YYYY-MM-DD`); calendar validity and cross-field
//! ordering are deliberately not enforced, matching the established API
//! behaviour.

use super::BookingSubmission;
use super::error::Error;

/// A single validation rule violation.
///
/// Carries the top-level error summary and the per-field guidance message
/// separately because the wire envelope reports both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    field: &'static str,
    error: String,
    message: &'static str,
}

impl ValidationFailure {
    fn missing(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            error: format!("Missing required field: {field}"),
            message,
        }
    }

    fn malformed(field: &'static str, error: &str, message: &'static str) -> Self {
        Self {
            field,
            error: error.to_owned(),
            message,
        }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Top-level error summary.
    pub fn error(&self) -> &str {
        self.error.as_str()
    }

    /// Per-field guidance message.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        Error::validation(failure.error.clone()).with_field_detail(failure.field, failure.message)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|raw| raw.trim().is_empty())
}

/// Whether a string has the shape `YYYY-MM-DD`.
///
/// Shape only: `2025-02-30` passes. Rejecting calendar-invalid dates would
/// tighten the contract observed by existing clients.
fn iso_date_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Check a submission against the required-field and format rules.
///
/// # Examples
/// ```
/// use backend::domain::{BookingSubmission, validate_submission};
///
/// let failure = validate_submission(&BookingSubmission::default())
///     .expect_err("empty submission");
/// assert_eq!(failure.field(), "pickupAddress");
/// ```
pub fn validate_submission(submission: &BookingSubmission) -> Result<(), ValidationFailure> {
    if is_blank(submission.pickup_address.as_deref()) {
        return Err(ValidationFailure::missing(
            "pickupAddress",
            "Pickup address is required",
        ));
    }

    if is_blank(submission.delivery_address.as_deref()) {
        return Err(ValidationFailure::missing(
            "deliveryAddress",
            "Delivery address is required",
        ));
    }

    let Some(pickup_date) = submission
        .pickup_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
    else {
        return Err(ValidationFailure::missing(
            "pickupDate",
            "Pickup date is required",
        ));
    };

    if !iso_date_shaped(pickup_date) {
        return Err(ValidationFailure::malformed(
            "pickupDate",
            "Invalid pickup date format",
            "Pickup date must be in ISO format (YYYY-MM-DD)",
        ));
    }

    if let Some(delivery_date) = submission.delivery_date.as_deref() {
        if !iso_date_shaped(delivery_date) {
            return Err(ValidationFailure::malformed(
                "deliveryDate",
                "Invalid delivery date format",
                "Delivery date must be in ISO format (YYYY-MM-DD)",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_submission() -> BookingSubmission {
        BookingSubmission {
            pickup_address: Some("1 Main St".to_owned()),
            delivery_address: Some("2 Oak Ave".to_owned()),
            pickup_date: Some("2025-06-01".to_owned()),
            ..BookingSubmission::default()
        }
    }

    #[rstest]
    fn accepts_minimal_valid_submission(valid_submission: BookingSubmission) {
        assert_eq!(validate_submission(&valid_submission), Ok(()));
    }

    #[rstest]
    #[case(None, "pickupAddress")]
    #[case(Some("   "), "pickupAddress")]
    fn rejects_blank_pickup_address(
        valid_submission: BookingSubmission,
        #[case] value: Option<&str>,
        #[case] field: &str,
    ) {
        let mut submission = valid_submission;
        submission.pickup_address = value.map(str::to_owned);

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), field);
        assert_eq!(failure.error(), "Missing required field: pickupAddress");
    }

    #[rstest]
    fn rejects_blank_delivery_address(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.delivery_address = None;

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), "deliveryAddress");
        assert_eq!(failure.message(), "Delivery address is required");
    }

    #[rstest]
    fn rejects_missing_pickup_date(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.pickup_date = None;

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), "pickupDate");
        assert_eq!(failure.error(), "Missing required field: pickupDate");
    }

    #[rstest]
    #[case("06/01/2025")]
    #[case("2025-6-1")]
    #[case("2025-06-01T00:00:00Z")]
    #[case("20250601")]
    fn rejects_malformed_pickup_date(valid_submission: BookingSubmission, #[case] date: &str) {
        let mut submission = valid_submission;
        submission.pickup_date = Some(date.to_owned());

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), "pickupDate");
        assert_eq!(failure.error(), "Invalid pickup date format");
    }

    #[rstest]
    fn rejects_malformed_delivery_date(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.delivery_date = Some("next week".to_owned());

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), "deliveryDate");
    }

    // Shape-only date checks: calendar-invalid dates are accepted on purpose.
    #[rstest]
    fn accepts_calendar_invalid_date(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.pickup_date = Some("2025-02-30".to_owned());

        assert_eq!(validate_submission(&submission), Ok(()));
    }

    #[rstest]
    fn accepts_delivery_before_pickup(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.delivery_date = Some("2024-01-01".to_owned());

        assert_eq!(validate_submission(&submission), Ok(()));
    }

    #[rstest]
    fn rule_order_reports_first_violation(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.pickup_address = None;
        submission.delivery_address = None;
        submission.pickup_date = Some("bad".to_owned());

        let failure = validate_submission(&submission).expect_err("must fail");
        assert_eq!(failure.field(), "pickupAddress");
    }

    #[rstest]
    fn failure_converts_to_domain_error(valid_submission: BookingSubmission) {
        let mut submission = valid_submission;
        submission.pickup_date = None;

        let failure = validate_submission(&submission).expect_err("must fail");
        let error = Error::from(failure);
        assert_eq!(
            error.details().map(|d| d.field.as_str()),
            Some("pickupDate")
        );
    }
}
