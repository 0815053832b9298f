//! 传输层：单次 HTTP 调用及其失败信号。
//!
//! Transport layer.
//!
//! A [`Transport`] performs exactly one POST of a chat-completion payload and
//! reports either the decoded JSON body or a raw [`TransportError`]. It never
//! decides retryability; classification happens in the client.

pub mod http;

pub use http::HttpTransport;

use crate::types::ChatCompletionRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Raw failure signal of a single attempt, before classification.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP status {status}")]
    Status {
        status: u16,
        body: String,
        retry_after_ms: Option<u64>,
    },

    #[error("attempt deadline of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("request was cancelled")]
    Cancelled,

    #[error("network failure: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Convenience for fake transports and tests.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        TransportError::Status {
            status,
            body: body.into(),
            retry_after_ms: None,
        }
    }
}

/// One-shot chat-completion transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the payload once and return the decoded success body.
    async fn post_json(
        &self,
        payload: &ChatCompletionRequest,
    ) -> std::result::Result<serde_json::Value, TransportError>;
}
