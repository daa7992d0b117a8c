//! Authentication failure taxonomy
//!
//! Every kind is distinct so it can be logged and monitored on its own,
//! while the HTTP layer collapses token failures into one uniform 401.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or unusable signing secret. Fatal, never retried.
    #[error("Auth configuration error: {0}")]
    Configuration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The stored credential is not a parseable hash
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Unexpected signing algorithm: {0}")]
    UnexpectedAlgorithm(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token claims: {0}")]
    MalformedClaims(String),

    #[error("Token expired")]
    ExpiredToken,
}

impl AuthError {
    /// Stable short name for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Configuration(_) => "configuration",
            AuthError::Hashing(_) => "hashing",
            AuthError::MalformedCredential(_) => "malformed_credential",
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::UnexpectedAlgorithm(_) => "unexpected_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::MalformedClaims(_) => "malformed_claims",
            AuthError::ExpiredToken => "expired_token",
        }
    }

    /// Whether the failure is answered with 401 rather than 500
    ///
    /// An unreadable stored credential counts as an authentication failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Configuration(_) | AuthError::Hashing(_))
    }
}
