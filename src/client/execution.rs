//! 请求执行逻辑：构造线上报文并在截止时间内执行单次尝试。
//!
//! Request execution logic (single attempt).

use crate::structured::JsonMode;
use crate::transport::{Transport, TransportError};
use crate::types::{ChatCompletionRequest, ChatMessage, GenerationRequest};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Build the wire payload for a validated request.
///
/// Exactly one system message followed by one user message; `response_format`
/// only when a schema was requested; only the supplied parameters.
pub(crate) fn build_payload(
    request: &GenerationRequest,
    model: &str,
    json_mode: JsonMode,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(request.system_message.clone()),
            ChatMessage::user(request.user_message.clone()),
        ],
        response_format: request
            .response_schema
            .as_ref()
            .map(|schema| json_mode.response_format(schema)),
        parameters: request.parameters.unwrap_or_default(),
    }
}

/// Perform exactly one POST bound to `deadline`.
///
/// Deadline expiry and caller cancellation both drop the in-flight future;
/// they are reported as distinct [`TransportError`] values so they are never
/// confused with a genuine network failure.
pub(crate) async fn execute_once(
    transport: &dyn Transport,
    payload: &ChatCompletionRequest,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<serde_json::Value, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        outcome = tokio::time::timeout(deadline, transport.post_json(payload)) => match outcome {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(deadline)),
        },
    }
}
