//! JSON error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// Error body: a human-readable `message` plus the HTTP status it came with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,

    #[serde(default)]
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(429, message)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal server error")
    }
}
