//! Stand-in backend error types
//!
//! Every failure becomes the `{"error": {code, message}}` envelope with a
//! matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorBody, ErrorEnvelope};

#[derive(Error, Debug)]
pub enum MockError {
    /// Missing or unknown bearer token
    #[error("Sign in required")]
    Unauthorized,

    /// Signed in, but not the owner
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MockError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MockError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            MockError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            MockError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            MockError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MockError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            MockError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            MockError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Stand-in backend error"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id: Some(request_id),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for stand-in backend handlers
pub type MockResult<T> = Result<T, MockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(MockError::Unauthorized.status_and_code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            MockError::Validation("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            MockError::PayloadTooLarge(10).into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
