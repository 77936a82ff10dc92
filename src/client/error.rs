//! REST client error types

use thiserror::Error;

use crate::auth::AuthError;
use crate::feed::Retryable;
use crate::models::ErrorEnvelope;

/// Errors that can occur when talking to the backend API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not signed in: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Classify a transport-level reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }

    /// Build an error from a non-success status and its (possibly empty) body
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => ("UNKNOWN".to_string(), body.trim().to_string()),
        };

        match status {
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            _ => ApiError::Api {
                status,
                code,
                message,
            },
        }
    }

    /// HTTP status behind this error, when there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Unavailable | ApiError::Timeout | ApiError::RateLimited => true,
            ApiError::Request(_) => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_reads_envelope() {
        let body = r#"{"error":{"code":"NOT_FOUND","message":"Post p9 not found"}}"#;
        let err = ApiError::from_status(404, body);
        assert!(matches!(&err, ApiError::NotFound(m) if m == "Post p9 not found"));
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(422, r#"{"error":{"code":"VALIDATION_ERROR","message":"body is empty"}}"#);
        match err {
            ApiError::Api { status, code, message } => {
                assert_eq!(status, 422);
                assert_eq!(code, "VALIDATION_ERROR");
                assert_eq!(message, "body is empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_mapping_plain_body() {
        let err = ApiError::from_status(502, "Bad Gateway\n");
        assert!(matches!(&err, ApiError::Api { code, message, .. } if code == "UNKNOWN" && message == "Bad Gateway"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        assert!(!ApiError::from_status(401, "").is_retryable());
        assert!(!ApiError::from_status(404, "").is_retryable());
        assert!(!ApiError::from_status(400, "").is_retryable());
        assert!(ApiError::from_status(429, "").is_retryable());
        assert!(ApiError::Timeout.is_retryable());
    }
}
