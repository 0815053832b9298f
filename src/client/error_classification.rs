//! Error classification logic
//!
//! Pure mapping from a raw [`TransportError`] to a member of the error
//! taxonomy. Classification itself never fails: unreadable error bodies fall
//! back to a generic `"<Kind> API error (<status>)"` message.

use crate::error_code::ErrorKind;
use crate::transport::TransportError;
use crate::{Error, ErrorContext};

/// Extract the provider's error message from an error body.
///
/// Accepts the OpenAI-style `{"error": {"message": ...}}`, a bare
/// `{"error": "..."}` and a top-level `{"message": ...}`.
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let msg = match json.get("error") {
        Some(serde_json::Value::String(s)) => Some(s.as_str()),
        Some(err) => err.get("message").and_then(|m| m.as_str()),
        None => None,
    }
    .or_else(|| json.get("message").and_then(|m| m.as_str()))?;

    let msg = msg.trim();
    if msg.is_empty() {
        None
    } else {
        Some(msg.to_string())
    }
}

fn fallback_message(kind: ErrorKind, status: u16) -> String {
    match kind {
        ErrorKind::Api => format!("API error ({})", status),
        _ => format!("{} API error ({})", kind.name(), status),
    }
}

/// Classify a non-2xx HTTP response.
pub fn classify_status(status: u16, body: &str, retry_after_ms: Option<u64>) -> Error {
    let kind = ErrorKind::from_http_status(status);
    let upstream = upstream_message(body);
    let mut context = ErrorContext::new()
        .with_status_code(status)
        .with_source("error_classifier");

    let message = match (kind, status) {
        (ErrorKind::Service, 503 | 504) | (ErrorKind::Auth | ErrorKind::Validation, _) => {
            upstream.unwrap_or_else(|| fallback_message(kind, status))
        }
        (ErrorKind::Service, _) => {
            if let Some(detail) = upstream {
                context = context.with_details(detail);
            }
            "Server error".to_string()
        }
        (ErrorKind::RateLimit, _) => {
            let message = upstream.unwrap_or_else(|| fallback_message(kind, status));
            return Error::RateLimit {
                message,
                retry_after_ms,
                context,
            };
        }
        _ => {
            if let Some(detail) = upstream {
                context = context.with_details(detail);
            }
            fallback_message(kind, status)
        }
    };

    Error::new(kind, message, context)
}

/// Classify any attempt failure.
pub fn classify(failure: TransportError) -> Error {
    let context = ErrorContext::new().with_source("error_classifier");
    match failure {
        TransportError::Status {
            status,
            body,
            retry_after_ms,
        } => classify_status(status, &body, retry_after_ms),
        TransportError::Timeout(deadline) => Error::new(
            ErrorKind::Timeout,
            format!("Request timed out after {}ms", deadline.as_millis()),
            context,
        ),
        TransportError::Cancelled => {
            Error::new(ErrorKind::Timeout, "Request was cancelled", context)
        }
        TransportError::Network(detail) => Error::new(
            ErrorKind::Network,
            "Network error while contacting the API",
            context.with_details(detail),
        ),
        TransportError::Other(detail) => Error::new(ErrorKind::Api, detail, context),
    }
}
