//! Authentication
//!
//! Login, logout and token issuance belong to the external identity provider.
//! This module only obtains a bearer token for API calls:
//!
//! - [`TokenProvider`]: the seam the REST client asks for a token
//! - [`StaticToken`]: a fixed token from config or the command line
//! - [`IdentityClient`]: reads the provider's session endpoint and caches the
//!   access token until shortly before it expires

mod identity;

pub use identity::{IdentityClient, Session, SessionUser};

use async_trait::async_trait;
use thiserror::Error;

/// Source of bearer tokens for the REST client
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, or `None` when browsing anonymously
    async fn access_token(&self) -> Result<Option<String>, AuthError>;

    /// Drop any cached token so the next call asks the provider again
    async fn invalidate(&self) {}
}

/// A token fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// No token: requests are sent without an `Authorization` header
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Empty strings count as no token
    pub fn from_option(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.token.clone())
    }
}

/// Errors talking to the identity provider
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Identity provider error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Invalid identity provider URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken::new("abc");
        assert_eq!(provider.access_token().await.unwrap().as_deref(), Some("abc"));

        let anonymous = StaticToken::anonymous();
        assert!(anonymous.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_token_is_anonymous() {
        let provider = StaticToken::from_option(Some("   ".to_string()));
        assert!(provider.access_token().await.unwrap().is_none());
    }
}
