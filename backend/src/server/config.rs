//! HTTP server configuration object and helpers.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;

use backend::domain::RetentionPolicy;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) retention: RetentionPolicy,
}

fn env_parsed<T>(name: &str) -> std::io::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|err| std::io::Error::other(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}

impl ServerConfig {
    /// Construct a configuration listening on the given address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            retention: RetentionPolicy::default(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// - `PORT`: listening port, default 8080.
    /// - `RETENTION_MAX_AGE_HOURS`: booking retention age, default 48.
    /// - `RETENTION_SWEEP_INTERVAL_SECS`: sweep cadence, default 3600.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when a variable is set but unparsable.
    pub fn from_env() -> std::io::Result<Self> {
        let port: u16 = env_parsed("PORT")?.unwrap_or(8080);
        let mut config = Self::new(SocketAddr::from(([0, 0, 0, 0], port)));

        if let Some(hours) = env_parsed::<i64>("RETENTION_MAX_AGE_HOURS")? {
            config.retention.max_age = Duration::hours(hours);
        }
        if let Some(secs) = env_parsed::<u64>("RETENTION_SWEEP_INTERVAL_SECS")? {
            config.retention.interval = StdDuration::from_secs(secs);
        }
        Ok(config)
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the PostgreSQL-backed booking
    /// repository; otherwise bookings live in process memory only.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the retention policy.
    #[must_use]
    pub fn with_retention_policy(mut self, policy: RetentionPolicy) -> Self {
        self.retention = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_without_overrides() {
        let config = ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], 8080)));

        assert_eq!(config.bind_addr().port(), 8080);
        assert!(config.db_pool.is_none());
        assert_eq!(config.retention, RetentionPolicy::default());
    }

    #[rstest]
    fn retention_policy_override_applies() {
        let policy = RetentionPolicy {
            max_age: Duration::hours(1),
            interval: StdDuration::from_secs(60),
        };
        let config =
            ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], 8080))).with_retention_policy(policy);

        assert_eq!(config.retention, policy);
    }
}
