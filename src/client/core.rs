use crate::client::error_classification::classify;
use crate::client::execution::{build_payload, execute_once};
use crate::client::parser::parse_completion;
use crate::client::policy::{Decision, RetryPolicy};
use crate::client::validation::validate_request;
use crate::config::ClientConfig;
use crate::error_code::ErrorKind;
use crate::telemetry::{TelemetryRecorder, UsageRecord};
use crate::transport::{Transport, TransportError};
use crate::types::{GeneratedContent, GenerationRequest, GenerationResult};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Typed chat-completion client.
///
/// Holds only immutable configuration and shared handles, so one instance can
/// serve concurrent callers. Each call runs its attempts strictly in sequence.
pub struct GenerationClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) policy: RetryPolicy,
    pub(crate) telemetry: TelemetryRecorder,
}

impl GenerationClient {
    /// Build a client from `OPENROUTER_API_KEY` and the `NOTES_AI_*` knobs,
    /// with the default transport.
    pub fn new() -> Result<Self> {
        crate::client::builder::GenerationClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::GenerationClientBuilder {
        crate::client::builder::GenerationClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Validate, call the provider with retries, and parse the response.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult<GeneratedContent>> {
        self.generate_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Like [`generate`](Self::generate), aborting as soon as `cancel` fires.
    ///
    /// Cancellation during an attempt or a backoff wait fails the call with a
    /// timeout error and is never retried.
    pub async fn generate_with_cancel(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationResult<GeneratedContent>> {
        self.run(request, cancel, Ok).await
    }

    /// Full call pipeline. `convert` shapes the parsed content and runs before
    /// telemetry, so the usage row reflects the outcome the caller sees.
    async fn run<T>(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
        convert: impl FnOnce(GenerationResult<GeneratedContent>) -> Result<GenerationResult<T>>,
    ) -> Result<GenerationResult<T>> {
        // Local validation failures never reach the network or telemetry.
        validate_request(&request)?;

        let request_id = Uuid::new_v4().to_string();
        let model = request
            .model_name
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let payload = build_payload(&request, &model, self.config.json_mode);
        let start = Instant::now();

        let outcome = self
            .run_attempts(&payload, &request_id, &cancel)
            .await
            .and_then(|body| {
                parse_completion(
                    body,
                    request.response_schema.as_ref(),
                    &model,
                    start.elapsed(),
                )
            })
            .and_then(convert)
            .map_err(|e| e.with_request_id(&request_id));

        let record = match &outcome {
            Ok(result) => {
                info!(
                    request_id = request_id.as_str(),
                    model = result.metadata.model_used.as_str(),
                    tokens_used = result.metadata.tokens_used,
                    duration_ms = result.metadata.generation_time_ms,
                    "notes-ai generation succeeded"
                );
                UsageRecord::success(&result.metadata.model_used, result.metadata.tokens_used)
            }
            Err(e) => {
                warn!(
                    request_id = request_id.as_str(),
                    model = model.as_str(),
                    error_code = e.code(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "notes-ai generation failed: {}",
                    e
                );
                UsageRecord::failure(&model, e.message())
            }
        };
        self.telemetry
            .record(record.with_correlation(request.user_id.clone(), request.note_id.clone()));

        outcome
    }

    /// Run the retry loop and return the raw success body.
    async fn run_attempts(
        &self,
        payload: &crate::types::ChatCompletionRequest,
        request_id: &str,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value> {
        let mut attempt: u32 = 1;
        loop {
            let failure =
                match execute_once(self.transport.as_ref(), payload, self.config.timeout, cancel)
                    .await
                {
                    Ok(body) => return Ok(body),
                    Err(TransportError::Cancelled) => return Err(cancelled()),
                    Err(e) => classify(e),
                };

            match self.policy.decide(&failure, attempt) {
                Decision::Fail => return Err(failure),
                Decision::Retry { delay } => {
                    warn!(
                        request_id,
                        attempt,
                        error_code = failure.code(),
                        delay_ms = delay.as_millis() as u64,
                        "notes-ai attempt failed, retrying: {}",
                        failure.message()
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Generate raw text; the request must not carry a schema.
    pub async fn generate_text(&self, request: GenerationRequest) -> Result<GenerationResult<String>> {
        if request.response_schema.is_some() {
            return Err(Error::validation_with_context(
                "responseSchema must be omitted for text generation",
                ErrorContext::new()
                    .with_field_path("responseSchema")
                    .with_source("generation_client"),
            ));
        }
        self.run(request, CancellationToken::new(), |result| {
            let metadata = result.metadata;
            match result.data {
                GeneratedContent::Text(text) => Ok(GenerationResult {
                    data: text,
                    metadata,
                }),
                GeneratedContent::Json(_) => Err(Error::parse("Expected text content")),
            }
        })
        .await
    }

    /// Generate schema-checked JSON and deserialize it into `T`.
    ///
    /// A value that passes the schema but does not fit `T` is a parse error and
    /// is recorded as a failed call.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult<T>> {
        if request.response_schema.is_none() {
            return Err(Error::validation_with_context(
                "responseSchema is required for structured generation",
                ErrorContext::new()
                    .with_field_path("responseSchema")
                    .with_source("generation_client"),
            ));
        }
        self.run(request, CancellationToken::new(), |result| {
            let metadata = result.metadata;
            let object = match result.data {
                GeneratedContent::Json(object) => object,
                GeneratedContent::Text(_) => {
                    return Err(Error::parse("Expected JSON object content"))
                }
            };
            let data = serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
                Error::parse_with_context(
                    format!("Response does not match target type: {}", e),
                    ErrorContext::new().with_source("generation_client"),
                )
            })?;
            Ok(GenerationResult { data, metadata })
        })
        .await
    }
}

fn cancelled() -> Error {
    Error::new(
        ErrorKind::Timeout,
        "Request was cancelled",
        ErrorContext::new().with_source("retry_coordinator"),
    )
}
