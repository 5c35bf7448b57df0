//! Tests for the booking intake service.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::*;
use crate::domain::ports::SubmissionDisposition;
use crate::domain::{BookingRecord, ErrorCode};
use crate::outbound::persistence::InMemoryBookingRepository;

fn submission() -> BookingSubmission {
    BookingSubmission {
        weight: Some("2000".to_owned()),
        pickup_address: Some("1 Main St".to_owned()),
        delivery_address: Some("2 Oak Ave".to_owned()),
        pickup_date: Some("2025-06-01".to_owned()),
        contact_name: Some("Ada".to_owned()),
        ..BookingSubmission::default()
    }
}

fn request(submission: BookingSubmission, key: Option<&str>) -> SubmitBookingRequest {
    SubmitBookingRequest {
        submission,
        idempotency_key: key.map(|raw| IdempotencyKey::new(raw).expect("valid key")),
        request_id: Some("req-1".to_owned()),
    }
}

fn memory_service() -> (
    BookingIntakeService<InMemoryBookingRepository>,
    Arc<InMemoryBookingRepository>,
) {
    let repository = Arc::new(InMemoryBookingRepository::new());
    (BookingIntakeService::new(Arc::clone(&repository)), repository)
}

fn sample_record(booking_id: &str, key: Option<&str>) -> BookingRecord {
    let now = Utc::now();
    BookingRecord {
        sequence_id: 1,
        booking_id: BookingId::new(booking_id).expect("valid id"),
        confirmation_code: crate::domain::ConfirmationCode::new("CONF-AAAAAA")
            .expect("valid code"),
        cargo_type: None,
        weight: Some("2000".to_owned()),
        dimensions: None,
        pickup_address: "1 Main St".to_owned(),
        delivery_address: "2 Oak Ave".to_owned(),
        pickup_date: "2025-06-01".to_owned(),
        pickup_time: None,
        delivery_date: None,
        service_type: None,
        add_ons: crate::domain::CargoAddOns::default(),
        contact_name: None,
        contact_phone: None,
        contact_email: None,
        special_instructions: None,
        status: BookingStatus::Pending,
        estimated_cost: EstimatedCost::from_cents(30_000),
        currency: CURRENCY.to_owned(),
        idempotency_key: key.map(|raw| IdempotencyKey::new(raw).expect("valid key")),
        request_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn persists_fresh_submission() {
    let (service, repository) = memory_service();

    let outcome = service
        .submit(request(submission(), Some("abc-1")))
        .await
        .expect("submission succeeds");

    assert_eq!(outcome.disposition, SubmissionDisposition::Created);
    assert!(outcome.confirmation.booking_id.as_str().starts_with("TRE-"));
    assert!(
        outcome
            .confirmation
            .confirmation_code
            .as_str()
            .starts_with("CONF-")
    );
    assert_eq!(outcome.confirmation.status, BookingStatus::Pending);
    assert_eq!(outcome.confirmation.estimated_cost.cents(), 30_000);
    assert_eq!(outcome.confirmation.currency, "USD");

    let stored = repository.list_recent_first().await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].pickup_address, "1 Main St");
    assert_eq!(stored[0].request_id.as_deref(), Some("req-1"));
}

#[tokio::test]
async fn replays_previous_response_for_known_key() {
    let (service, repository) = memory_service();

    let first = service
        .submit(request(submission(), Some("abc-1")))
        .await
        .expect("first submission");
    let second = service
        .submit(request(submission(), Some("abc-1")))
        .await
        .expect("second submission");

    assert_eq!(second.disposition, SubmissionDisposition::Replayed);
    assert_eq!(
        second.confirmation.booking_id,
        first.confirmation.booking_id
    );
    assert_eq!(
        second.confirmation.confirmation_code,
        first.confirmation.confirmation_code
    );

    let stored = repository.list_recent_first().await.expect("list");
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn keyless_submissions_always_create() {
    let (service, repository) = memory_service();

    service
        .submit(request(submission(), None))
        .await
        .expect("first submission");
    service
        .submit(request(submission(), None))
        .await
        .expect("second submission");

    let stored = repository.list_recent_first().await.expect("list");
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn validation_failure_writes_nothing() {
    let (service, repository) = memory_service();
    let mut invalid = submission();
    invalid.pickup_date = None;

    let error = service
        .submit(request(invalid, Some("abc-1")))
        .await
        .expect_err("must fail validation");

    assert_eq!(error.code(), ErrorCode::ValidationError);
    assert_eq!(error.details().map(|d| d.field.as_str()), Some("pickupDate"));
    assert!(
        repository
            .list_recent_first()
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn concurrent_same_key_submissions_persist_once() {
    let (service, repository) = memory_service();

    let (first, second) = tokio::join!(
        service.submit(request(submission(), Some("abc-1"))),
        service.submit(request(submission(), Some("abc-1"))),
    );
    let first = first.expect("first submission");
    let second = second.expect("second submission");

    assert_eq!(
        first.confirmation.booking_id,
        second.confirmation.booking_id
    );
    let stored = repository.list_recent_first().await.expect("list");
    assert_eq!(stored.len(), 1);
}

/// Repository double whose first insert reports a booking-id collision and
/// then delegates to an in-memory store.
struct CollidingRepository {
    inner: InMemoryBookingRepository,
    collided: AtomicBool,
    attempts: AtomicUsize,
}

impl CollidingRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryBookingRepository::new(),
            collided: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BookingRepository for CollidingRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.collided.swap(true, Ordering::SeqCst) {
            return Err(BookingRepositoryError::duplicate_booking_id(
                booking.booking_id.as_str(),
            ));
        }
        self.inner.insert(booking).await
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        self.inner.find_by_idempotency_key(key).await
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        self.inner.find_by_booking_id(booking_id).await
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        self.inner.list_recent_first().await
    }

    async fn delete_older_than(
        &self,
        max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        self.inner.delete_older_than(max_age).await
    }
}

#[tokio::test]
async fn regenerates_booking_id_on_collision() {
    let repository = Arc::new(CollidingRepository::new());
    let service = BookingIntakeService::new(Arc::clone(&repository));

    let outcome = service
        .submit(request(submission(), None))
        .await
        .expect("second identifier wins");

    assert_eq!(outcome.disposition, SubmissionDisposition::Created);
    assert!(repository.attempts.load(Ordering::SeqCst) >= 2);
}

/// Repository double that always reports booking-id collisions.
struct SaturatedRepository {
    attempts: AtomicUsize,
}

#[async_trait]
impl BookingRepository for SaturatedRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BookingRepositoryError::duplicate_booking_id(
            booking.booking_id.as_str(),
        ))
    }

    async fn find_by_idempotency_key(
        &self,
        _key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        Ok(None)
    }

    async fn find_by_booking_id(
        &self,
        _booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        Ok(None)
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_older_than(
        &self,
        _max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        Ok(0)
    }
}

#[tokio::test]
async fn id_generation_attempts_are_bounded() {
    let repository = Arc::new(SaturatedRepository {
        attempts: AtomicUsize::new(0),
    });
    let service = BookingIntakeService::new(Arc::clone(&repository));

    let error = service
        .submit(request(submission(), None))
        .await
        .expect_err("id space saturated");

    assert_eq!(error.code(), ErrorCode::ServerError);
    assert_eq!(repository.attempts.load(Ordering::SeqCst), 5);
}

/// Repository double scripting an idempotency race: the pre-insert lookup
/// misses, the insert reports a key conflict, and the retry lookup finds
/// the winner.
struct RaceLosingRepository {
    winner: Mutex<Option<BookingRecord>>,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
}

impl RaceLosingRepository {
    fn new(winner: BookingRecord) -> Self {
        Self {
            winner: Mutex::new(Some(winner)),
            lookups: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BookingRepository for RaceLosingRepository {
    async fn insert(&self, _booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(BookingRepositoryError::duplicate_idempotency_key(
            "concurrent insert detected",
        ))
    }

    async fn find_by_idempotency_key(
        &self,
        _key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let lookup = self.lookups.fetch_add(1, Ordering::SeqCst);
        if lookup == 0 {
            // First lookup happens before the racing insert lands.
            return Ok(None);
        }
        let winner = self
            .winner
            .lock()
            .map_err(|_| BookingRepositoryError::query("winner lock poisoned"))?;
        Ok(winner.clone())
    }

    async fn find_by_booking_id(
        &self,
        _booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        Ok(None)
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_older_than(
        &self,
        _max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        Ok(0)
    }
}

#[tokio::test]
async fn race_loser_replays_winning_record() {
    let winner = sample_record("TRE-20250601-042", Some("abc-1"));
    let repository = Arc::new(RaceLosingRepository::new(winner.clone()));
    let service = BookingIntakeService::new(Arc::clone(&repository));

    let outcome = service
        .submit(request(submission(), Some("abc-1")))
        .await
        .expect("race loser recovers");

    assert_eq!(outcome.disposition, SubmissionDisposition::Replayed);
    assert_eq!(outcome.confirmation.booking_id, winner.booking_id);
    assert_eq!(repository.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(repository.lookups.load(Ordering::SeqCst), 2);
}

/// Repository double that fails every operation with a connection error.
struct UnavailableRepository;

#[async_trait]
impl BookingRepository for UnavailableRepository {
    async fn insert(&self, _booking: &NewBooking) -> Result<BookingRecord, BookingRepositoryError> {
        Err(BookingRepositoryError::connection("connection refused"))
    }

    async fn find_by_idempotency_key(
        &self,
        _key: &IdempotencyKey,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        Err(BookingRepositoryError::connection("connection refused"))
    }

    async fn find_by_booking_id(
        &self,
        _booking_id: &BookingId,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        Err(BookingRepositoryError::connection("connection refused"))
    }

    async fn list_recent_first(&self) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        Err(BookingRepositoryError::connection("connection refused"))
    }

    async fn delete_older_than(
        &self,
        _max_age: Duration,
    ) -> Result<u64, BookingRepositoryError> {
        Err(BookingRepositoryError::connection("connection refused"))
    }
}

#[tokio::test]
async fn store_outage_surfaces_as_service_unavailable() {
    let service = BookingIntakeService::new(Arc::new(UnavailableRepository));

    let error = service
        .submit(request(submission(), None))
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn get_returns_detail_projection() {
    let (service, _repository) = memory_service();
    let outcome = service
        .submit(request(submission(), None))
        .await
        .expect("submission");

    let detail = service
        .get(&outcome.confirmation.booking_id)
        .await
        .expect("detail");

    assert_eq!(detail.pickup_address, "1 Main St");
    assert_eq!(detail.contact_name.as_deref(), Some("Ada"));
    assert_eq!(detail.estimated_cost.cents(), 30_000);
}

#[tokio::test]
async fn get_unknown_booking_is_not_found() {
    let (service, _repository) = memory_service();
    let missing = BookingId::new("TRE-20250601-999").expect("valid id");

    let error = service.get(&missing).await.expect_err("unknown id");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Booking not found");
}

#[tokio::test]
async fn list_returns_summaries_newest_first() {
    let (service, _repository) = memory_service();
    let first = service
        .submit(request(submission(), None))
        .await
        .expect("first");
    let second = service
        .submit(request(submission(), None))
        .await
        .expect("second");

    let listing = service.list().await.expect("list");

    assert_eq!(listing.total, 2);
    assert_eq!(
        listing.bookings[0].booking_id,
        second.confirmation.booking_id
    );
    assert_eq!(
        listing.bookings[1].booking_id,
        first.confirmation.booking_id
    );
}
