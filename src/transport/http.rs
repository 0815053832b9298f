use crate::config::{AppIdentity, ClientConfig};
use crate::transport::{Transport, TransportError};
use crate::types::ChatCompletionRequest;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed transport for an OpenAI-compatible chat-completion endpoint.
///
/// The overall per-attempt deadline is enforced by the caller; this client only
/// bounds connection establishment.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    app: Option<AppIdentity>,
    connect_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let connect_timeout = Duration::from_secs(
            env::var("NOTES_AI_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(10),
        );

        let mut builder = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(
                env::var("NOTES_AI_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(16),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("NOTES_AI_PROXY_URL") {
            match Proxy::all(&proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(
                    proxy = proxy_url.as_str(),
                    error = %e,
                    "ignoring invalid NOTES_AI_PROXY_URL"
                ),
            }
        }

        let client = builder.build().map_err(|e| {
            Error::new(
                crate::error_code::ErrorKind::Api,
                format!("Failed to build HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
            api_key: config.api_key.clone(),
            app: config.app.clone(),
            connect_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Best-effort parsing of `Retry-After`.
    ///
    /// Only the `Retry-After: <seconds>` form is supported.
    fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
        let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
        let secs: u64 = raw.parse().ok()?;
        Some(secs.saturating_mul(1000))
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            // Only connection establishment is bounded by reqwest itself.
            TransportError::Timeout(self.connect_timeout)
        } else if e.is_connect() || e.is_request() || e.is_body() {
            // A body cut off mid-read is a dropped connection.
            TransportError::Network(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        payload: &ChatCompletionRequest,
    ) -> std::result::Result<serde_json::Value, TransportError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(payload);

        if let Some(app) = &self.app {
            req = req
                .header("HTTP-Referer", app.url.as_str())
                .header("X-Title", app.name.as_str());
        }

        let resp = req.send().await.map_err(|e| self.map_reqwest_error(e))?;
        let status = resp.status();

        if !status.is_success() {
            let retry_after_ms = Self::retry_after_ms(resp.headers());
            let body = resp.text().await.unwrap_or_default();
            debug!(
                http_status = status.as_u16(),
                body_len = body.len(),
                "chat completion returned non-success status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
                retry_after_ms,
            });
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| self.map_reqwest_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn retry_after_seconds_form() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(HttpTransport::retry_after_ms(&headers), Some(30_000));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(HttpTransport::retry_after_ms(&headers), None);
    }

    #[test]
    fn endpoint_comes_from_config() {
        let mut config = ClientConfig::new("sk-test");
        config.base_url = "http://127.0.0.1:9/api/v1".into();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.endpoint(),
            "http://127.0.0.1:9/api/v1/chat/completions"
        );
    }
}
