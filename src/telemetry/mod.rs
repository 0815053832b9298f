//! 用量遥测模块：尽力而为、不阻塞调用方的用量记录。
//!
//! Usage telemetry.
//!
//! After every `generate` call that reached the network, the client hands a
//! [`UsageRecord`] to the configured [`UsageSink`] on a detached task. Sink
//! failures (errors or panics) are logged and swallowed; they never change the
//! result of the call. Without a sink, recording is skipped entirely.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`UsageRecord`] | One append-only telemetry row |
//! | [`UsageSink`] | Trait for record destinations |
//! | [`InMemoryUsageSink`] | In-memory sink for testing |
//! | [`TracingUsageSink`] | Logs records through `tracing` |
//! | [`CompositeUsageSink`] | Multi-destination composite sink |
//! | [`TelemetryRecorder`] | Fire-and-forget dispatcher used by the client |

mod recorder;
mod sinks;

pub use recorder::TelemetryRecorder;
pub use sinks::{CompositeUsageSink, InMemoryUsageSink, TracingUsageSink};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Outcome of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Success,
    Failure,
}

impl UsageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStatus::Success => "success",
            UsageStatus::Failure => "failure",
        }
    }
}

/// One usage row, as written to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    pub model_name: String,
    pub status: UsageStatus,
    /// Success only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    /// Failure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Unix seconds
    pub created_at: f64,
}

impl UsageRecord {
    pub fn success(model_name: impl Into<String>, tokens_used: u64) -> Self {
        Self {
            user_id: None,
            note_id: None,
            model_name: model_name.into(),
            status: UsageStatus::Success,
            tokens_used: Some(tokens_used),
            error_message: None,
            created_at: timestamp(),
        }
    }

    pub fn failure(model_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            user_id: None,
            note_id: None,
            model_name: model_name.into(),
            status: UsageStatus::Failure,
            tokens_used: None,
            error_message: Some(error_message.into()),
            created_at: timestamp(),
        }
    }

    pub fn with_correlation(mut self, user_id: Option<String>, note_id: Option<String>) -> Self {
        self.user_id = user_id;
        self.note_id = note_id;
        self
    }
}

/// Append-only destination for usage records.
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Insert one record. Errors are logged by the recorder and otherwise ignored.
    async fn insert(&self, record: UsageRecord) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_record_shape() {
        let record = UsageRecord::success("openai/gpt-4o-mini", 42)
            .with_correlation(Some("u-1".into()), None);
        let mut v = serde_json::to_value(&record).unwrap();
        assert!(v["created_at"].as_f64().unwrap() > 0.0);
        v.as_object_mut().unwrap().remove("created_at");
        assert_eq!(
            v,
            json!({
                "user_id": "u-1",
                "model_name": "openai/gpt-4o-mini",
                "status": "success",
                "tokens_used": 42
            })
        );
    }

    #[test]
    fn failure_record_has_no_tokens() {
        let record = UsageRecord::failure("a/b", "Server error");
        assert_eq!(record.status.as_str(), "failure");
        assert_eq!(record.tokens_used, None);
        assert_eq!(record.error_message.as_deref(), Some("Server error"));
    }
}
