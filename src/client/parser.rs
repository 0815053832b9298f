//! Response parsing for successful chat-completion calls.
//!
//! Extracts `choices[0].message.content`, rejects truncated output, and for
//! schema-bearing requests parses the content as a JSON object and runs the
//! structured-output validator. Parser failures are never retried: the
//! provider answered, the payload itself was defective.

use crate::structured::{OutputValidator, SchemaDescriptor};
use crate::types::{ChatCompletionResponse, GeneratedContent, GenerationMetadata, GenerationResult};
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

/// Maximum number of content characters echoed in a JSON parse error.
pub const PARSE_ERROR_PREVIEW_CHARS: usize = 500;

fn parse_error(message: impl Into<String>) -> Error {
    Error::parse_with_context(message, ErrorContext::new().with_source("response_parser"))
}

/// First `max` characters of `content`, with an ellipsis when cut.
fn preview(content: &str, max: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Parse a decoded success body.
///
/// `requested_model` is reported as `model_used` when the body omits `model`;
/// `elapsed` is measured by the caller around the whole call.
pub fn parse_completion(
    body: serde_json::Value,
    schema: Option<&SchemaDescriptor>,
    requested_model: &str,
    elapsed: Duration,
) -> Result<GenerationResult<GeneratedContent>> {
    let response: ChatCompletionResponse = serde_json::from_value(body)
        .map_err(|e| parse_error(format!("Unexpected API response format: {}", e)))?;

    let choice = response
        .choices
        .first()
        .ok_or_else(|| parse_error("API response missing choices array"))?;

    if choice.finish_reason.as_deref() == Some("length") {
        return Err(parse_error("Response truncated by max_tokens limit"));
    }

    let content = choice
        .message
        .as_ref()
        .and_then(|m| m.content.as_deref())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| parse_error("API response missing message content"))?;

    let data = match schema {
        None => GeneratedContent::Text(content.to_string()),
        Some(schema) => GeneratedContent::Json(parse_structured(content, schema)?),
    };

    let metadata = GenerationMetadata {
        model_used: response
            .model
            .clone()
            .unwrap_or_else(|| requested_model.to_string()),
        tokens_used: response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0),
        generation_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    };

    Ok(GenerationResult { data, metadata })
}

fn parse_structured(
    content: &str,
    schema: &SchemaDescriptor,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        Error::parse_with_context(
            format!(
                "Failed to parse JSON response: {}",
                preview(content, PARSE_ERROR_PREVIEW_CHARS)
            ),
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("response_parser"),
        )
    })?;

    let serde_json::Value::Object(object) = value else {
        return Err(parse_error("Response data must be an object"));
    };

    OutputValidator::new(schema).validate(&object)?;
    Ok(object)
}
