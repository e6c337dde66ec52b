//! Authentication ports and the bearer-token guard.

use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
}

/// Token service trait for signed access tokens.
pub trait TokenService: Send + Sync {
    /// Issue an access token for a user.
    fn issue_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Verify a token's signature and expiry and decode its claims.
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a password against a stored hash.
    ///
    /// Returns `false` on mismatch and on a malformed hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Token signing error: {0}")]
    SigningError(String),
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    match token.trim() {
        "" => Err(AuthError::MissingToken),
        token => Ok(token),
    }
}

/// Verify-then-continue guard placed in front of protected handlers.
pub fn authenticate(
    header: Option<&str>,
    tokens: &dyn TokenService,
) -> Result<TokenClaims, AuthError> {
    let token = bearer_token(header)?;
    tokens.verify_token(token)
}
