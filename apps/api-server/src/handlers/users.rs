//! User listing.

use actix_web::{HttpResponse, web};

use board_shared::dto::UsersResponse;

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users - Protected route, newest accounts first.
pub async fn list_users(
    _identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let users = state.users.list_newest_first().await?;

    Ok(HttpResponse::Ok().json(UsersResponse {
        users: users.into_iter().map(user_response).collect(),
    }))
}
