//! Plain-text rendering of client views.

use board_shared::dto::{HealthResponse, UserResponse, VersionResponse};

use crate::dashboard::{DashboardState, Notice};
use crate::error::ClientError;
use crate::routes::View;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Posts listed under "Recent posts"; the full list lives at `/api/posts`.
pub const RECENT_POSTS_SHOWN: usize = 5;

pub fn render_user(user: &UserResponse) -> String {
    format!(
        "{} <{}> (joined {})",
        user.username,
        user.email,
        user.created_at.format(DATE_FORMAT)
    )
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Success(message) => format!("[ok] {message}"),
        Notice::Error(message) => format!("[error] {message}"),
    }
}

/// Instructions for the screens that take input.
pub fn render_prompt(view: View) -> String {
    match view {
        View::Login => "Sign in with: board login <email> <password>".to_string(),
        View::Register => {
            "Create an account with: board register <username> <email> <password>".to_string()
        }
        View::Dashboard => "Show the dashboard with: board dashboard".to_string(),
    }
}

pub fn render_dashboard(state: &DashboardState, account: Option<&UserResponse>) -> String {
    let data = match state {
        DashboardState::Loading => return "Loading dashboard...".to_string(),
        DashboardState::Failed(banner) => return render_notice(&Notice::Error(banner.clone())),
        DashboardState::Ready(data) => data,
    };

    let account = account.map(|u| u.username.as_str()).unwrap_or("N/A");
    let mut lines = vec![
        "Dashboard".to_string(),
        format!("  Total users:  {}", data.stats.total_users),
        format!("  Total posts:  {}", data.stats.total_posts),
        format!("  Your account: {account}"),
        String::new(),
        "Recent posts".to_string(),
    ];

    if data.posts.is_empty() {
        lines.push("  No posts yet. Create the first one!".to_string());
    }
    for post in data.posts.iter().take(RECENT_POSTS_SHOWN) {
        lines.push(format!(
            "  {} by {} on {}",
            post.title,
            post.username,
            post.created_at.format(DATE_FORMAT)
        ));
        lines.push(format!("    {}", post.content));
    }

    lines.push(String::new());
    lines.push(format!("Users ({})", data.users.len()));
    lines.extend(data.users.iter().map(|user| format!("  {}", render_user(user))));

    lines.join("\n")
}

/// Server reachability, as reported by `/health` and `/version`.
pub fn render_status(
    health: &Result<HealthResponse, ClientError>,
    version: &Result<VersionResponse, ClientError>,
) -> String {
    let health = match health {
        Ok(health) => format!(
            "Health:  {} (database {}, {})",
            health.status, health.database, health.environment
        ),
        Err(err) => format!("Health:  unavailable ({err})"),
    };
    let version = match version {
        Ok(version) => format!(
            "Version: {} (JWT secret configured: {})",
            version.version,
            if version.jwt_configured { "yes" } else { "no" }
        ),
        Err(err) => format!("Version: unavailable ({err})"),
    };

    format!("{health}\n{version}")
}
