use crate::client::core::GenerationClient;
use crate::client::policy::RetryPolicy;
use crate::config::{AppIdentity, ClientConfig, API_KEY_ENV};
use crate::structured::JsonMode;
use crate::telemetry::{TelemetryRecorder, UsageSink};
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Without [`from_config`](Self::from_config), the starting configuration is
/// the defaults plus every `NOTES_AI_*` environment knob (see [`crate::config`]);
/// a missing API key falls back to `OPENROUTER_API_KEY`. Explicit setters
/// always win over the environment.
#[derive(Default)]
pub struct GenerationClientBuilder {
    config: Option<ClientConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry_attempts: Option<u32>,
    retry_delay: Option<Duration>,
    default_model: Option<String>,
    app: Option<AppIdentity>,
    json_mode: Option<JsonMode>,
    usage_sink: Option<Arc<dyn UsageSink>>,
    transport: Option<Arc<dyn Transport>>,
}

impl GenerationClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration; later setters still override it.
    pub fn from_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-attempt deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Additional attempts after the first.
    pub fn retry_attempts(mut self, n: u32) -> Self {
        self.retry_attempts = Some(n);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Send `HTTP-Referer` / `X-Title` attribution headers.
    pub fn app_identity(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.app = Some(AppIdentity {
            url: url.into(),
            name: name.into(),
        });
        self
    }

    pub fn json_mode(mut self, mode: JsonMode) -> Self {
        self.json_mode = Some(mode);
        self
    }

    /// Inject a usage sink. Without one, telemetry is skipped.
    pub fn usage_sink(mut self, sink: Arc<dyn UsageSink>) -> Self {
        self.usage_sink = Some(sink);
        self
    }

    /// Replace the HTTP transport (fakes in tests, custom stacks in apps).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// Fails with an auth error when no usable API key is available and with a
    /// validation error for a malformed base URL. No network call is made.
    pub fn build(self) -> Result<GenerationClient> {
        let mut config = match self.config {
            Some(config) => config,
            None => ClientConfig::new(
                self.api_key
                    .clone()
                    .or_else(|| std::env::var(API_KEY_ENV).ok())
                    .unwrap_or_default(),
            )
            .with_env_overrides(),
        };

        if let Some(key) = self.api_key {
            config.api_key = key;
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(n) = self.retry_attempts {
            config.retry_attempts = n;
        }
        if let Some(delay) = self.retry_delay {
            config.retry_delay = delay;
        }
        if let Some(model) = self.default_model {
            config.default_model = model;
        }
        if let Some(app) = self.app {
            config.app = Some(app);
        }
        if let Some(mode) = self.json_mode {
            config.json_mode = mode;
        }

        config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        Ok(GenerationClient {
            policy: RetryPolicy::new(config.retry_attempts, config.retry_delay),
            telemetry: TelemetryRecorder::new(self.usage_sink),
            transport,
            config,
        })
    }
}
