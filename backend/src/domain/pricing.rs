//! Cost estimation from declared cargo weight.
//!
//! Deterministic and infallible: malformed input degrades to a reference
//! weight instead of failing, so a price is always quoted.

use super::EstimatedCost;

/// Rate applied per declared pound, in dollars.
const RATE_PER_POUND: f64 = 0.15;

/// Minimum charge floor, in dollars.
const MINIMUM_CHARGE: f64 = 100.0;

/// Reference weight substituted for absent or unparsable declarations.
const DEFAULT_WEIGHT_POUNDS: f64 = 1000.0;

/// Estimate the cost of moving the declared weight.
///
/// `cost = max(weight × rate, minimum charge)`, rounded to whole cents.
/// Absent, unparsable, and non-finite weights fall back to the reference
/// weight; the floor guarantees the estimate never drops below the minimum
/// charge regardless of input.
///
/// # Examples
/// ```
/// use backend::domain::estimate_cost;
///
/// assert_eq!(estimate_cost(Some("2000")).as_dollars(), 300.0);
/// assert_eq!(estimate_cost(Some("10")).as_dollars(), 100.0);
/// assert_eq!(estimate_cost(None).as_dollars(), 150.0);
/// ```
pub fn estimate_cost(weight: Option<&str>) -> EstimatedCost {
    let pounds = weight
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(DEFAULT_WEIGHT_POUNDS);

    let dollars = (pounds * RATE_PER_POUND).max(MINIMUM_CHARGE);
    EstimatedCost::from_cents((dollars * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("2000"), 30_000)]
    #[case(Some("4000"), 60_000)]
    #[case(Some(" 1500 "), 22_500)]
    #[case(Some("667"), 10_005)]
    fn scales_with_weight(#[case] weight: Option<&str>, #[case] cents: i64) {
        assert_eq!(estimate_cost(weight).cents(), cents);
    }

    #[rstest]
    #[case(Some("0"))]
    #[case(Some("-50"))]
    #[case(Some("10"))]
    #[case(Some("666"))]
    fn floor_applies_to_small_weights(#[case] weight: Option<&str>) {
        assert_eq!(estimate_cost(weight).cents(), 10_000);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("heavy"))]
    #[case(Some("12kg"))]
    #[case(Some("inf"))]
    #[case(Some("NaN"))]
    fn unparsable_weight_uses_reference_weight(#[case] weight: Option<&str>) {
        assert_eq!(estimate_cost(weight).cents(), 15_000);
    }

    #[rstest]
    fn never_below_minimum_charge() {
        for weight in [None, Some("0"), Some("-1"), Some("1"), Some("junk")] {
            assert!(estimate_cost(weight).cents() >= 10_000);
        }
    }
}
