//! Account handlers: registration, login and the current user.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use board_core::DomainError;
use board_core::domain::User;
use board_core::validation::{EMAIL_MAX_LEN, RequiredFields, USERNAME_MAX_LEN, ensure_max_len};
use board_shared::dto::{
    CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut fields = RequiredFields::new();
    let username = fields.take("username", req.username);
    let email = fields.take("email", req.email);
    let password = fields.take("password", req.password);
    fields.finish()?;

    ensure_max_len("username", &username, USERNAME_MAX_LEN)?;
    ensure_max_len("email", &email, EMAIL_MAX_LEN)?;

    if state
        .users
        .find_by_email_or_username(&email, &username)
        .await?
        .is_some()
    {
        return Err(DomainError::Duplicate(username).into());
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    let passwords = state.passwords.clone();
    let password_hash = web::block(move || passwords.hash(&password)).await??;

    let user = state
        .users
        .insert(User::new(username, email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User created successfully".to_string(),
        user: user_response(user),
    }))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut fields = RequiredFields::new();
    let email = fields.take("email", req.email);
    let password = fields.take("password", req.password);
    fields.finish()?;

    let user = state.users.find_by_email(&email).await?;

    // Unknown emails still pay for a verification.
    let passwords = state.passwords.clone();
    let stored_hash: Arc<str> = match &user {
        Some(user) => user.password_hash.as_str().into(),
        None => Arc::clone(&state.missing_user_hash),
    };
    let valid = web::block(move || passwords.verify(&password, &stored_hash)).await?;

    let user = match user {
        Some(user) if valid => user,
        Some(user) => {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AppError::InvalidCredentials);
        }
        None => return Err(AppError::InvalidCredentials),
    };

    let token = state.tokens.issue_token(user.id, &user.username)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user_response(user),
    }))
}

/// GET /api/me - Protected route
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    // A valid signature is not enough once the account is gone.
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        user: user_response(user),
    }))
}
