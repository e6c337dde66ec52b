//! Application state - shared across all handlers.

use std::sync::Arc;

use board_core::ports::{AuthError, PasswordService, PostRepository, TokenService, UserRepository};
use board_infra::{Argon2PasswordService, JwtTokenService, SqlPostRepository, SqlUserRepository};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Verified against when a login names an unknown email, so both
    /// outcomes cost one Argon2 run.
    pub missing_user_hash: Arc<str>,
    pub environment: String,
    pub api_key_present: bool,
    pub jwt_configured: bool,
}

impl AppState {
    /// Build the application state on top of an open connection pool.
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Result<Self, AuthError> {
        let passwords = Argon2PasswordService::new(config.password)?;
        let tokens = JwtTokenService::new(config.jwt.clone());
        let missing_user_hash = passwords.hash("missing-user-placeholder")?;

        tracing::info!(environment = %config.environment, "Application state initialized");

        Ok(Self {
            users: Arc::new(SqlUserRepository::new(Arc::clone(&db))),
            posts: Arc::new(SqlPostRepository::new(Arc::clone(&db))),
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
            missing_user_hash: missing_user_hash.into(),
            db,
            environment: config.environment.clone(),
            api_key_present: config.api_key_present,
            jwt_configured: config.jwt_configured,
        })
    }
}
