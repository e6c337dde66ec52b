//! Dashboard loading and post submission.

use board_shared::dto::{CreatePostRequest, DashboardStats, PostWithAuthorResponse, UserResponse};

use crate::api::ApiClient;

pub const LOAD_FAILED: &str = "Failed to load dashboard data";
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const POST_CREATED: &str = "Post created successfully!";
pub const POST_FAILED: &str = "Failed to create post";

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub posts: Vec<PostWithAuthorResponse>,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Ready(DashboardData),
    Failed(String),
}

/// Banner shown after a post submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Fetch stats, posts and users together.
///
/// Nothing is shown unless all three succeed.
pub async fn load(api: &ApiClient) -> DashboardState {
    match futures::try_join!(api.dashboard(), api.posts(), api.users()) {
        Ok((dashboard, posts, users)) => DashboardState::Ready(DashboardData {
            stats: dashboard.stats,
            posts: posts.posts,
            users: users.users,
        }),
        Err(err) => {
            tracing::warn!("Dashboard error: {}", err);
            DashboardState::Failed(LOAD_FAILED.to_string())
        }
    }
}

/// Validate and submit a post, reloading the dashboard on success.
///
/// Blank fields are rejected locally and no request is sent.
pub async fn submit_post(
    api: &ApiClient,
    title: &str,
    content: &str,
) -> (Notice, Option<DashboardState>) {
    if title.trim().is_empty() || content.trim().is_empty() {
        return (Notice::Error(FILL_ALL_FIELDS.to_string()), None);
    }

    let request = CreatePostRequest {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
    };

    match api.create_post(&request).await {
        Ok(_) => (
            Notice::Success(POST_CREATED.to_string()),
            Some(load(api).await),
        ),
        Err(err) => {
            tracing::warn!("Create post error: {}", err);
            (Notice::Error(POST_FAILED.to_string()), None)
        }
    }
}
