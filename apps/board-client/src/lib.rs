//! # Board Client
//!
//! Terminal front end for the Board API: session handling, route
//! resolution and the dashboard view.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod render;
pub mod routes;
pub mod session;
pub mod store;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::Session;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
