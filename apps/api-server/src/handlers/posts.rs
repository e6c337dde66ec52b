//! Post handlers.

use actix_web::{HttpResponse, web};

use board_core::RepoError;
use board_core::domain::Post;
use board_core::validation::{RequiredFields, TITLE_MAX_LEN, ensure_max_len};
use board_shared::dto::{CreatePostRequest, CreatePostResponse, PostsResponse};

use super::{post_response, post_with_author_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts - Protected route
///
/// The author is the token's subject; the body cannot choose it.
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut fields = RequiredFields::new();
    let title = fields.take("title", req.title);
    let content = fields.take("content", req.content);
    fields.finish()?;

    ensure_max_len("title", &title, TITLE_MAX_LEN)?;

    if state.users.find_by_id(identity.user_id).await?.is_none() {
        tracing::warn!(user_id = %identity.user_id, "Post rejected: author no longer exists");
        return Err(AppError::InvalidToken);
    }

    let post = state
        .posts
        .insert(Post::new(identity.user_id, title, content))
        .await
        .map_err(|err| match err {
            // Author deleted between the check and the insert.
            RepoError::ForeignKey(_) => AppError::InvalidToken,
            other => other.into(),
        })?;

    tracing::info!(
        post_id = %post.id,
        user_id = %post.user_id,
        username = %identity.username,
        "Post created"
    );

    Ok(HttpResponse::Created().json(CreatePostResponse {
        message: "Post created successfully".to_string(),
        post: post_response(post),
    }))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_with_authors(None).await?;

    Ok(HttpResponse::Ok().json(PostsResponse {
        posts: posts.into_iter().map(post_with_author_response).collect(),
    }))
}
