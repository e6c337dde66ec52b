//! Dashboard statistics.

use actix_web::{HttpResponse, web};

use board_shared::dto::{DashboardResponse, DashboardStats};

use super::recent_post;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const RECENT_POSTS_LIMIT: u64 = 5;

/// GET /api/dashboard
///
/// Counts are computed on every request.
pub async fn dashboard(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (total_users, total_posts, recent) = futures::try_join!(
        state.users.count(),
        state.posts.count(),
        state.posts.list_with_authors(Some(RECENT_POSTS_LIMIT)),
    )?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        stats: DashboardStats {
            total_users,
            total_posts,
            recent_posts: recent.into_iter().map(recent_post).collect(),
        },
    }))
}
