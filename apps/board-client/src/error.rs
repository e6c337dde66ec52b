//! Client error type.

/// Errors surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Token storage failed: {0}")]
    Store(#[from] std::io::Error),
}

impl ClientError {
    /// The server refused the credentials or token (401/403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejection() {
        let missing = ClientError::Api {
            status: 401,
            message: "Access token required".into(),
        };
        let invalid = ClientError::Api {
            status: 403,
            message: "Invalid token".into(),
        };
        let server = ClientError::Api {
            status: 500,
            message: "Internal server error".into(),
        };

        assert!(missing.is_auth_rejection());
        assert!(invalid.is_auth_rejection());
        assert!(!server.is_auth_rejection());
        assert_eq!(invalid.to_string(), "Invalid token");
    }
}
