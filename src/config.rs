//! 客户端配置：超时、重试、默认模型与归属标识头。
//!
//! Client configuration.
//!
//! Defaults are production-friendly and every knob is env-overridable through
//! [`ClientConfig::from_env`]:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENROUTER_API_KEY` | required |
//! | `NOTES_AI_BASE_URL` | `https://openrouter.ai/api/v1` |
//! | `NOTES_AI_TIMEOUT_MS` | `60000` |
//! | `NOTES_AI_RETRY_ATTEMPTS` | `2` |
//! | `NOTES_AI_RETRY_DELAY_MS` | `1000` |
//! | `NOTES_AI_DEFAULT_MODEL` | `openai/gpt-4o-mini` |
//! | `NOTES_AI_APP_URL` / `NOTES_AI_APP_NAME` | unset |
//! | `NOTES_AI_JSON_MODE` | `json_object` |
//!
//! The HTTP transport additionally reads:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NOTES_AI_CONNECT_TIMEOUT_SECS` | `10` |
//! | `NOTES_AI_POOL_MAX_IDLE_PER_HOST` | `16` |
//! | `NOTES_AI_PROXY_URL` | unset; an unparseable value is logged and ignored |

use crate::structured::JsonMode;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::warn;

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Attribution headers sent as `HTTP-Referer` / `X-Title`.
///
/// Both values travel together; there is no way to configure only one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub url: String,
    pub name: String,
}

/// Resolved client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-attempt deadline
    pub timeout: Duration,
    /// Additional attempts after the first
    pub retry_attempts: u32,
    /// Base backoff delay, doubled for each further retry
    pub retry_delay: Duration,
    pub default_model: String,
    pub app: Option<AppIdentity>,
    pub json_mode: JsonMode,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("default_model", &self.default_model)
            .field("app", &self.app)
            .field("json_mode", &self.json_mode)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            default_model: DEFAULT_MODEL.to_string(),
            app: None,
            json_mode: JsonMode::default(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let config = Self::new(env::var(API_KEY_ENV).unwrap_or_default()).with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply every `NOTES_AI_*` knob that is set; the API key is left untouched.
    ///
    /// Unparseable values keep the current setting.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("NOTES_AI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(ms) = env_parse::<u64>("NOTES_AI_TIMEOUT_MS").filter(|ms| *ms > 0) {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse::<u32>("NOTES_AI_RETRY_ATTEMPTS") {
            self.retry_attempts = n;
        }
        if let Some(ms) = env_parse::<u64>("NOTES_AI_RETRY_DELAY_MS") {
            self.retry_delay = Duration::from_millis(ms);
        }
        if let Some(model) = non_blank_env("NOTES_AI_DEFAULT_MODEL") {
            self.default_model = model;
        }
        if let Some(mode) = env::var("NOTES_AI_JSON_MODE")
            .ok()
            .and_then(|s| s.parse::<JsonMode>().ok())
        {
            self.json_mode = mode;
        }

        match (non_blank_env("NOTES_AI_APP_URL"), non_blank_env("NOTES_AI_APP_NAME")) {
            (Some(url), Some(name)) => self.app = Some(AppIdentity { url, name }),
            (None, None) => {}
            _ => {
                warn!("NOTES_AI_APP_URL and NOTES_AI_APP_NAME must be set together; ignoring both")
            }
        }
        self
    }

    /// Reject configurations that could never make a successful call.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::new(
                crate::error_code::ErrorKind::Auth,
                format!("{} is not configured", API_KEY_ENV),
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("client_config"),
            ));
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::validation_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_source("client_config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::validation_with_context(
                format!("Base URL must use http or https, got {}", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_source("client_config"),
            ));
        }

        if self.default_model.trim().is_empty() {
            return Err(Error::validation_with_context(
                "defaultModel cannot be empty",
                ErrorContext::new()
                    .with_field_path("default_model")
                    .with_source("client_config"),
            ));
        }

        Ok(())
    }

    /// Full URL of the chat-completion endpoint.
    pub fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorKind;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("sk-test");
        assert_eq!(config.timeout, Duration::from_millis(60_000));
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.retry_delay, Duration::from_millis(1_000));
        assert!(config.app.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_key_is_an_auth_error() {
        let err = ClientConfig::new("   ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = ClientConfig::new("sk-test");
        config.base_url = "ftp://example.com".into();
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Validation);

        config.base_url = "not a url".into();
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn endpoint_url_joins_cleanly() {
        let mut config = ClientConfig::new("sk-test");
        config.base_url = "http://localhost:1234/api/v1/".into();
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:1234/api/v1/chat/completions"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", ClientConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
