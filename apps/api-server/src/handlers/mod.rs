//! HTTP handlers and route configuration.

mod auth;
mod dashboard;
mod health;
mod posts;
mod users;

use actix_web::{HttpResponse, Resource, guard, web};

use board_core::domain::{Post, PostWithAuthor, User};
use board_shared::dto::{PostResponse, PostWithAuthorResponse, RecentPost, UserResponse};

use crate::middleware::error::{AppError, json_error_handler};
use crate::middleware::headers::{ALLOWED_HEADERS, ALLOWED_METHODS};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // CORS preflight for any path
        .service(
            web::resource("/{tail:.*}")
                .guard(guard::Options())
                .to(preflight),
        )
        // Diagnostics
        .service(endpoint("/health").route(web::get().to(health::health)))
        .service(endpoint("/version").route(web::get().to(health::version)))
        .service(
            web::scope("/api")
                .service(endpoint("/register").route(web::post().to(auth::register)))
                .service(endpoint("/login").route(web::post().to(auth::login)))
                .service(endpoint("/me").route(web::get().to(auth::me)))
                .service(endpoint("/users").route(web::get().to(users::list_users)))
                .service(
                    endpoint("/posts")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .service(endpoint("/dashboard").route(web::get().to(dashboard::dashboard)))
                .default_service(web::to(not_found)),
        )
        .default_service(web::to(not_found));
}

/// A resource that answers unsupported methods with 404 rather than 405.
fn endpoint(path: &str) -> Resource {
    web::resource(path).default_service(web::to(not_found))
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header(("Access-Control-Allow-Methods", ALLOWED_METHODS))
        .insert_header(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
        .insert_header(("Access-Control-Max-Age", "86400"))
        .finish()
}

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        user_id: post.user_id,
        created_at: post.created_at,
    }
}

fn post_with_author_response(entry: PostWithAuthor) -> PostWithAuthorResponse {
    PostWithAuthorResponse {
        id: entry.post.id,
        title: entry.post.title,
        content: entry.post.content,
        user_id: entry.post.user_id,
        username: entry.username,
        created_at: entry.post.created_at,
    }
}

fn recent_post(entry: PostWithAuthor) -> RecentPost {
    RecentPost {
        title: entry.post.title,
        username: entry.username,
        created_at: entry.post.created_at,
    }
}
