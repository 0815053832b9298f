//! Chat-completion response body and the result returned to callers.

use serde::{Deserialize, Serialize};

/// Decoded success body of the chat-completion endpoint.
///
/// Every field is lenient: shape problems are reported by the response
/// parser with a specific message instead of a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Choice>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Choice>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting reported by the provider.
///
/// Counters may be missing or `null`; both decode as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Metadata attached to every successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub model_used: String,
    pub tokens_used: u64,
    pub generation_time_ms: u64,
}

/// Parsed data plus call metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult<T> {
    pub data: T,
    pub metadata: GenerationMetadata,
}

impl<T> GenerationResult<T> {
    /// Transform the data while keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GenerationResult<U> {
        GenerationResult {
            data: f(self.data),
            metadata: self.metadata,
        }
    }
}

/// Content of a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    /// Raw message content; the request had no schema
    Text(String),
    /// Schema-validated JSON object
    Json(serde_json::Map<String, serde_json::Value>),
}

impl GeneratedContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GeneratedContent::Text(s) => Some(s),
            GeneratedContent::Json(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            GeneratedContent::Text(_) => None,
            GeneratedContent::Json(map) => Some(map),
        }
    }
}
