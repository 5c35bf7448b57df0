//! Backend entry-point: wires the booking REST endpoints, health probes,
//! and OpenAPI docs.

mod server;

use std::env;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut config = ServerConfig::from_env()?;

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_pending_migrations(&database_url).map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
        info!("booking store: postgresql");
    } else {
        warn!("DATABASE_URL not set; bookings will not survive a restart");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
