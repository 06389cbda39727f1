//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] wandersoul_db::DbError),
}

impl AuthError {
    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "expired",
            AuthError::MalformedToken => "malformed",
            AuthError::MissingAuthHeader => "missing_header",
            AuthError::InvalidAuthHeader => "invalid_header",
            AuthError::InsufficientPermissions => "forbidden",
            AuthError::UserNotFound => "user_not_found",
            AuthError::PasswordHash(_) | AuthError::Jwt(_) | AuthError::Database(_) => "internal",
        }
    }

    /// Status code and client-facing message
    ///
    /// Token failures share one message. Insufficient permissions are
    /// reported as 401, not 403.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid email or password"),
            AuthError::MissingAuthHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization Header")
            }
            AuthError::InvalidAuthHeader
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::MalformedToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::InsufficientPermissions => (
                StatusCode::UNAUTHORIZED,
                "You are not authorized to access this route",
            ),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AuthError::PasswordHash(_) | AuthError::Jwt(_) | AuthError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(error = %self, "authentication failed with internal error");
        }

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
