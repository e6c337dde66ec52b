//! Health and version endpoints.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use board_shared::dto::{HealthResponse, VersionResponse};

use crate::state::AppState;

/// GET /health - pings the database.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.db.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            database: "connected".to_string(),
            environment: state.environment.clone(),
        }),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            HttpResponse::InternalServerError().json(HealthResponse {
                status: "unhealthy".to_string(),
                timestamp: Utc::now(),
                database: "disconnected".to_string(),
                environment: state.environment.clone(),
            })
        }
    }
}

/// GET /version
pub async fn version(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_key_present: state.api_key_present,
        jwt_configured: state.jwt_configured,
        environment: state.environment.clone(),
    })
}
