//! Scheduled booking retention.
//!
//! The original system deleted aged bookings as a side effect of the list
//! read. Retention here is an explicit periodic sweep owned by the host
//! process, so reads stay pure and the deletion cadence is independent of
//! traffic.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::ports::{BookingRepository, BookingRepositoryError};

/// How long bookings are retained and how often the sweep runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Bookings older than this are deleted.
    pub max_age: Duration,
    /// Interval between sweep runs.
    pub interval: StdDuration,
}

impl Default for RetentionPolicy {
    /// Two-day retention, swept hourly.
    fn default() -> Self {
        Self {
            max_age: Duration::days(2),
            interval: StdDuration::from_secs(3600),
        }
    }
}

/// Periodic sweep deleting bookings past their retention age.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use backend::domain::{RetentionPolicy, RetentionSweeper};
/// use backend::outbound::persistence::InMemoryBookingRepository;
///
/// let sweeper = RetentionSweeper::new(
///     Arc::new(InMemoryBookingRepository::new()),
///     RetentionPolicy::default(),
/// );
/// let _task = sweeper.spawn();
/// ```
pub struct RetentionSweeper {
    repository: Arc<dyn BookingRepository>,
    policy: RetentionPolicy,
}

impl RetentionSweeper {
    /// Create a sweeper over the given repository and policy.
    pub fn new(repository: Arc<dyn BookingRepository>, policy: RetentionPolicy) -> Self {
        Self { repository, policy }
    }

    /// Run a single sweep. Idempotent; returns the number of deleted rows.
    pub async fn run_once(&self) -> Result<u64, BookingRepositoryError> {
        let deleted = self
            .repository
            .delete_older_than(self.policy.max_age)
            .await?;
        if deleted > 0 {
            info!(deleted, "retention sweep removed aged bookings");
        }
        Ok(deleted)
    }

    /// Spawn the sweep loop on the current runtime.
    ///
    /// The first sweep runs immediately, then repeats at the policy
    /// interval. Failures are logged and the loop continues; a transient
    /// store outage must not kill retention.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.policy.interval);
            loop {
                ticker.tick().await;
                if let Err(error) = self.run_once().await {
                    warn!(%error, "retention sweep failed");
                }
            }
        })
    }
}
