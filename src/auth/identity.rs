//! Identity provider session client
//!
//! Reads `GET {issuer}/api/auth/session`, which answers `{}` when nobody is
//! signed in and otherwise `{user, accessToken, expires}`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{AuthError, TokenProvider};

/// Tokens this close to expiry are treated as expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// An active session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires - Duration::seconds(EXPIRY_MARGIN_SECS) > now
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(default)]
    user: Option<SessionUser>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires: Option<DateTime<Utc>>,
}

impl SessionResponse {
    fn into_session(self) -> Option<Session> {
        Some(Session {
            user: self.user?,
            access_token: self.access_token?,
            expires: self.expires?,
        })
    }
}

/// Client for the external identity provider
pub struct IdentityClient {
    client: Client,
    issuer_url: String,
    session_cookie: Option<String>,
    cached: RwLock<Option<Session>>,
}

impl IdentityClient {
    pub fn new(issuer_url: &str) -> Result<Self, AuthError> {
        if !issuer_url.starts_with("http://") && !issuer_url.starts_with("https://") {
            return Err(AuthError::InvalidUrl(issuer_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("smokering/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            issuer_url: issuer_url.trim_end_matches('/').to_string(),
            session_cookie: None,
            cached: RwLock::new(None),
        })
    }

    /// Builder method: forward a browser session cookie to the provider
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    /// Where to send the user to sign in
    pub fn sign_in_url(&self, callback_url: &str) -> String {
        format!(
            "{}/api/auth/signin?callbackUrl={}",
            self.issuer_url,
            urlencoding::encode(callback_url)
        )
    }

    /// Where to send the user to sign out
    pub fn sign_out_url(&self) -> String {
        format!("{}/api/auth/signout", self.issuer_url)
    }

    /// Fetch the current session, `None` when signed out
    pub async fn session(&self) -> Result<Option<Session>, AuthError> {
        let mut request = self
            .client
            .get(format!("{}/api/auth/session", self.issuer_url));
        if let Some(cookie) = &self.session_cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: SessionResponse = response.json().await?;
        let session = body.into_session();
        match &session {
            Some(s) => tracing::debug!(expires = %s.expires, "Identity session active"),
            None => tracing::debug!("No identity session"),
        }
        Ok(session)
    }
}

#[async_trait]
impl TokenProvider for IdentityClient {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let now = Utc::now();
        if let Some(session) = self.cached.read().await.as_ref() {
            if session.is_fresh(now) {
                return Ok(Some(session.access_token.clone()));
            }
        }

        let session = self.session().await?;
        let token = session
            .as_ref()
            .filter(|s| s.is_fresh(now))
            .map(|s| s.access_token.clone());
        *self.cached.write().await = session;
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_issuer() {
        assert!(matches!(
            IdentityClient::new("ftp://auth.example"),
            Err(AuthError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_sign_in_url_encodes_callback() {
        let client = IdentityClient::new("https://auth.example/").unwrap();
        assert_eq!(
            client.sign_in_url("http://localhost:8084/feed?x=1"),
            "https://auth.example/api/auth/signin?callbackUrl=http%3A%2F%2Flocalhost%3A8084%2Ffeed%3Fx%3D1"
        );
        assert_eq!(client.sign_out_url(), "https://auth.example/api/auth/signout");
    }

    #[test]
    fn test_empty_session_response() {
        let body: SessionResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_session().is_none());
    }

    #[test]
    fn test_session_freshness_margin() {
        let now = Utc::now();
        let session = Session {
            user: SessionUser {
                id: None,
                name: Some("ash".into()),
                email: None,
                image: None,
            },
            access_token: "t".into(),
            expires: now + Duration::seconds(30),
        };
        assert!(!session.is_fresh(now));

        let later = Session {
            expires: now + Duration::hours(1),
            ..session
        };
        assert!(later.is_fresh(now));
    }
}
