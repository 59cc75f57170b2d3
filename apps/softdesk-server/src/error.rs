//! Server error types.

use api_protocol::{ErrorCode, ErrorResponse, FieldError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracker_store::StoreError;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request body or parameters.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// Resource not found or not visible to the requester.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// A validation error on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = FieldError::new(field, message);
        Self::Validation {
            message: field.message.clone(),
            fields: vec![field],
        }
    }

    /// A validation error about the request as a whole.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    fn internal(&self) -> Response {
        tracing::error!(error = %self, "Request failed with internal error");
        let body = ErrorResponse::new(ErrorCode::InternalError, INTERNAL_MESSAGE);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Validation { message, fields } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationError, message).with_fields(fields),
            ),
            ServerError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, msg),
            ),
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(ErrorCode::AuthenticationRequired, "Authentication required"),
            ),
            ServerError::PermissionDenied(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new(ErrorCode::PermissionDenied, msg),
            ),
            // A row can disappear between the handler's lookup and its write.
            ServerError::Store(StoreError::NotFound { entity_type, .. }) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, format!("{entity_type} not found")),
            ),
            ServerError::Auth(ref e) if e.is_client_error() => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(ErrorCode::AuthenticationRequired, e.to_string()),
            ),
            other => return other.internal(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
