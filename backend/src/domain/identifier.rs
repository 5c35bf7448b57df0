//! Human-facing identifier generation.
//!
//! Pure functions over an injected random source so tests can drive a
//! seeded generator. The booking-id random segment has a small domain
//! (001–999 per day); uniqueness is enforced by the store's constraint,
//! with the intake service regenerating on collision.

use chrono::NaiveDate;
use rand::Rng;

use super::{BookingId, ConfirmationCode};

const BOOKING_ID_PREFIX: &str = "TRE";
const CONFIRMATION_PREFIX: &str = "CONF";
const CONFIRMATION_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CONFIRMATION_SUFFIX_LEN: usize = 6;

/// Generate a booking identifier of the form `TRE-YYYYMMDD-NNN`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
/// let id = backend::domain::generate_booking_id(date, &mut SmallRng::seed_from_u64(7));
/// assert!(id.as_str().starts_with("TRE-20250601-"));
/// ```
pub fn generate_booking_id<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> BookingId {
    let sequence: u16 = rng.gen_range(1..=999);
    BookingId::new_unchecked(format!(
        "{BOOKING_ID_PREFIX}-{}-{sequence:03}",
        date.format("%Y%m%d")
    ))
}

/// Generate a confirmation code of the form `CONF-XXXXXX`.
///
/// The suffix draws six characters from the uppercase-alphanumeric
/// alphabet. Codes are not required to be unique.
pub fn generate_confirmation_code<R: Rng + ?Sized>(rng: &mut R) -> ConfirmationCode {
    let mut code = String::with_capacity(CONFIRMATION_PREFIX.len() + 1 + CONFIRMATION_SUFFIX_LEN);
    code.push_str(CONFIRMATION_PREFIX);
    code.push('-');
    for _ in 0..CONFIRMATION_SUFFIX_LEN {
        let index = rng.gen_range(0..CONFIRMATION_ALPHABET.len());
        code.push(char::from(CONFIRMATION_ALPHABET[index]));
    }
    ConfirmationCode::new_unchecked(code)
}
