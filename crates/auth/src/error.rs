//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// JWT validation failed.
    #[error("JWT validation failed: {0}")]
    JwtValidation(String),

    /// JWT encoding failed.
    #[error("JWT encoding failed: {0}")]
    JwtEncoding(String),

    /// Token expired.
    #[error("Token expired")]
    TokenExpired,

    /// Invalid token.
    #[error("Invalid token")]
    InvalidToken,

    /// A token of the wrong kind was presented.
    #[error("Expected {expected} token")]
    WrongTokenKind { expected: &'static str },

    /// Hashing or parsing a password hash failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => AuthError::InvalidToken,
            _ => AuthError::JwtValidation(e.to_string()),
        }
    }
}

impl AuthError {
    /// Returns true if the error stems from the presented credentials rather
    /// than from a server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::JwtEncoding(_) | Self::PasswordHash(_))
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
