//! HTTP error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use userbase_auth::AuthError;

/// API error type.
///
/// Every variant renders as `{"error": "..."}`. Server-side failures carry a
/// fixed per-operation message; their detail only reaches the logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("User not found")]
    NotFound,
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a service error, using `context` as the message for server faults.
    pub fn from_auth(err: AuthError, context: &'static str) -> Self {
        match err {
            AuthError::NotFound(_) => ApiError::NotFound,
            AuthError::Validation(e) => {
                tracing::debug!(field = e.field(), code = e.code(), "Payload rejected");
                ApiError::BadRequest(e.to_string())
            }
            AuthError::InvalidCredentials => ApiError::BadRequest("Invalid credentials".to_string()),
            AuthError::InvalidToken(e) => ApiError::BadRequest(format!("Invalid token: {}", e)),
            AuthError::Storage(_) | AuthError::Crypto(_) => {
                tracing::error!(error = %err, "{}", context);
                ApiError::Internal(context)
            }
        }
    }

    /// Status code this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use userbase_storage::StorageError;
    use userbase_types::ValidationError;

    #[test]
    fn test_auth_error_mapping() {
        let err = ApiError::from_auth(AuthError::NotFound("x".into()), "Failed to fetch user");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "User not found");

        let err = ApiError::from_auth(AuthError::InvalidCredentials, "Failed to log in");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = ApiError::from_auth(
            ValidationError::PasswordTooShort { min: 6 }.into(),
            "Failed to register user",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = ApiError::from_auth(
            AuthError::Storage(StorageError::Backend("mongodb://admin:pw@db".into())),
            "Failed to fetch users",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch users");
    }

    #[test]
    fn test_timeout_status() {
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ApiError::Timeout.to_string(), "Request timed out");
    }
}
