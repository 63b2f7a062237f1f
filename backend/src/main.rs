//! Backend entry-point: loads configuration, migrates the database and
//! serves the REST API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use booktracker::config::AppConfig;
use booktracker::inbound::http::health::HealthState;
use booktracker::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use booktracker::server::{ServerConfig, create_server};

fn other(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppConfig::load().map_err(other)?;
    settings.warn_on_insecure_defaults();

    let database_path = settings.database_path().map_err(other)?;
    run_migrations(&database_path).await.map_err(other)?;
    let pool = DbPool::new(PoolConfig::new(&database_path).with_max_size(settings.pool_max_size()))
        .await
        .map_err(other)?;

    let config = ServerConfig::new(&settings, pool);
    info!(addr = %config.bind_addr(), database = %database_path, "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
