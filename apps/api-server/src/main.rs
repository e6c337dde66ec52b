//! # Board API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{HttpServer, web};
use anyhow::Context;
use board_core::ports::RateLimiter;
use migration::{Migrator, MigratorTrait};

use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState, build_app};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().context("invalid configuration")?;

    let db = board_infra::database::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    let db = Arc::new(db);

    Migrator::up(db.as_ref(), None)
        .await
        .context("failed to apply database migrations")?;
    tracing::info!("Database schema is up to date");

    let state = AppState::new(Arc::clone(&db), &config).context("invalid password hashing settings")?;
    let state = web::Data::new(state);
    let limiter = rate_limiter(&config)?;

    tracing::info!(
        "Starting Board API Server on {}:{}",
        config.host,
        config.port
    );

    // actix-web stops gracefully on SIGINT/SIGTERM.
    HttpServer::new(move || build_app(state.clone(), limiter.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    tracing::info!("Server stopped, closing database pool");
    db.close_by_ref()
        .await
        .context("failed to close the database pool")?;

    Ok(())
}

#[cfg(feature = "rate-limit")]
fn rate_limiter(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn RateLimiter>>> {
    let limiter = board_infra::InMemoryRateLimiter::new(config.rate_limit.clone())
        .context("invalid rate limit settings")?;
    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Rate limiting enabled"
    );
    Ok(Some(Arc::new(limiter)))
}

#[cfg(not(feature = "rate-limit"))]
fn rate_limiter(_config: &AppConfig) -> anyhow::Result<Option<Arc<dyn RateLimiter>>> {
    tracing::info!("Rate limiting disabled");
    Ok(None)
}
