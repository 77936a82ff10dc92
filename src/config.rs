//! Configuration
//!
//! TOML file settings for the client, the feed and the stand-in backend,
//! overridable through `SMOKERING_*` environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::feed::{FeedFilter, FeedKey, FeedSettings, FeedSort};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub mock: MockConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8090/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Root of the identity provider, e.g. `https://smokering.app`
    pub issuer_url: Option<String>,

    /// Static bearer token; takes precedence over the provider session
    pub token: Option<String>,

    /// Session cookie forwarded when reading the provider session
    pub session_cookie: Option<String>,
}

/// Feed pagination and polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub default_sort: FeedSort,

    #[serde(default)]
    pub default_filter: FeedFilter,
}

fn default_page_size() -> u32 {
    10
}

fn default_poll_interval() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            poll_interval_secs: default_poll_interval(),
            default_sort: FeedSort::default(),
            default_filter: FeedFilter::default(),
        }
    }
}

/// Stand-in backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_mock_host")]
    pub host: String,

    #[serde(default = "default_mock_port")]
    pub port: u16,
}

fn default_mock_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mock_port() -> u16 {
    8090
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: default_mock_host(),
            port: default_mock_port(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Parse a TOML file without looking at the environment
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let config: Config = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults with `SMOKERING_*` variables applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// File values, then `SMOKERING_*` variables on top
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// First readable file among the user config dir, `/etc/smokering` and
    /// the working directory; environment only when none loads.
    pub fn load_default() -> Self {
        let candidates = [
            dirs::config_dir().map(|dir| dir.join("smokering").join("config.toml")),
            Some(PathBuf::from("/etc/smokering/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        let found = candidates
            .into_iter()
            .flatten()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_with_env(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "config loaded");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping config file");
                    None
                }
            });

        found.unwrap_or_else(|| {
            tracing::debug!("no config file, using defaults and environment");
            Self::from_env()
        })
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        if self.feed.page_size == 0 {
            return Err(ConfigError::Invalid("feed.page_size must be at least 1".to_string()));
        }
        if self.feed.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "feed.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Overlay `SMOKERING_*` values; unparsable numbers are ignored
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("SMOKERING_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("SMOKERING_API_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.api.request_timeout_secs = timeout;
        }

        if let Some(issuer) = var("SMOKERING_ISSUER_URL") {
            self.identity.issuer_url = Some(issuer);
        }
        if let Some(token) = var("SMOKERING_TOKEN") {
            self.identity.token = Some(token);
        }
        if let Some(cookie) = var("SMOKERING_SESSION_COOKIE") {
            self.identity.session_cookie = Some(cookie);
        }

        if let Some(size) = var("SMOKERING_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            self.feed.page_size = size;
        }
        if let Some(secs) = var("SMOKERING_POLL_INTERVAL").and_then(|v| v.parse().ok()) {
            self.feed.poll_interval_secs = secs;
        }

        if let Some(host) = var("SMOKERING_MOCK_HOST") {
            self.mock.host = host;
        }
        if let Some(port) = var("SMOKERING_MOCK_PORT").and_then(|v| v.parse().ok()) {
            self.mock.port = port;
        }

        if let Some(level) = var("SMOKERING_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SMOKERING_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_ms: self.api.request_timeout_secs * 1000,
        }
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            key: FeedKey::new(self.feed.default_sort, self.feed.default_filter),
            page_size: self.feed.page_size.max(1),
            poll_interval: Duration::from_secs(self.feed.poll_interval_secs.max(1)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("{path:?} is not valid TOML: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Commented config file matching the built-in defaults
pub fn generate_default_config() -> String {
    r#"# Smokering
#
# Every setting can be overridden from the environment:
# - SMOKERING_API_URL
# - SMOKERING_API_TIMEOUT
# - SMOKERING_ISSUER_URL
# - SMOKERING_TOKEN
# - SMOKERING_SESSION_COOKIE
# - SMOKERING_PAGE_SIZE
# - SMOKERING_POLL_INTERVAL
# - SMOKERING_MOCK_HOST
# - SMOKERING_MOCK_PORT
# - SMOKERING_LOG_LEVEL
# - SMOKERING_LOG_FORMAT

[api]
# Backend REST API root
base_url = "http://localhost:8090/api/v1"

# Seconds before a request is abandoned
request_timeout_secs = 10

[identity]
# Identity provider root; sessions are read from {issuer_url}/api/auth/session
# issuer_url = "http://localhost:8090"

# Static bearer token, used instead of the provider session when set
# token = ""

# Session cookie sent when reading the provider session
# session_cookie = "next-auth.session-token=..."

[feed]
# Posts per page
page_size = 10

# Seconds between checks for new posts
poll_interval_secs = 30

# newest or top
default_sort = "newest"

# all, following or reviews
default_filter = "all"

[mock]
# Stand-in backend bind address
host = "127.0.0.1"
port = 8090

[logging]
# trace, debug, info, warn or error; RUST_LOG wins when set
level = "info"

# pretty for a terminal, json for log collectors
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8090/api/v1");
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.feed.poll_interval_secs, 30);
        assert_eq!(config.feed.default_sort, FeedSort::Newest);
        assert_eq!(config.mock.port, 8090);
        assert!(config.identity.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[feed]\npage_size = 25\ndefault_filter = \"reviews\"\n\n[identity]\ntoken = \"abc\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.feed.page_size, 25);
        assert_eq!(config.feed.default_filter, FeedFilter::Reviews);
        assert_eq!(config.feed.poll_interval_secs, 30);
        assert_eq!(config.identity.token.as_deref(), Some("abc"));
        assert_eq!(config.logging.format, "pretty");

        let settings = config.feed_settings();
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.key, FeedKey::new(FeedSort::Newest, FeedFilter::Reviews));
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\npage_size = 0").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Invalid(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = 1").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));

        assert!(matches!(
            Config::load(Path::new("/nonexistent/smokering.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SMOKERING_API_URL", "https://api.smokering.app/api/v1"),
            ("SMOKERING_POLL_INTERVAL", "5"),
            ("SMOKERING_MOCK_PORT", "not-a-port"),
            ("SMOKERING_TOKEN", "t0k"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.smokering.app/api/v1");
        assert_eq!(config.feed.poll_interval_secs, 5);
        assert_eq!(config.mock.port, 8090);
        assert_eq!(config.identity.token.as_deref(), Some("t0k"));
        assert_eq!(config.client_config().request_timeout_ms, 10_000);
    }
}
