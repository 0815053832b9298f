use crate::error_code::ErrorKind;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Request field that caused the error (e.g., "systemMessage", "parameters.temperature")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., upstream message, expected type)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "request_validator", "response_parser")
    pub source: Option<String>,
    /// HTTP status of the failed attempt, when there was one
    pub status_code: Option<u16>,
    /// Client-side correlation id of the `generate` call
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Unified error type for generation calls.
///
/// One variant per [`ErrorKind`]; retryability is a property of the kind, so
/// retry policy is a single [`Error::is_retryable`] check.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Authentication error: {message}{}", format_context(.context))]
    Auth {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Rate limit error: {message}{}", format_context(.context))]
    RateLimit {
        message: String,
        retry_after_ms: Option<u64>,
        context: ErrorContext,
    },

    #[error("Timeout error: {message}{}", format_context(.context))]
    Timeout {
        message: String,
        context: ErrorContext,
    },

    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    #[error("Service error: {message}{}", format_context(.context))]
    Service {
        message: String,
        context: ErrorContext,
    },

    #[error("API error: {message}{}", format_context(.context))]
    Api {
        message: String,
        context: ErrorContext,
    },

    #[error("Parse error: {message}{}", format_context(.context))]
    Parse {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(status) = ctx.status_code {
        parts.push(format!("status: {}", status));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Build an error of the given kind. Rate limit errors get no retry-after hint.
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: ErrorContext) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Auth => Error::Auth { message, context },
            ErrorKind::Validation => Error::Validation { message, context },
            ErrorKind::RateLimit => Error::RateLimit {
                message,
                retry_after_ms: None,
                context,
            },
            ErrorKind::Timeout => Error::Timeout { message, context },
            ErrorKind::Network => Error::Network { message, context },
            ErrorKind::Service => Error::Service { message, context },
            ErrorKind::Api => Error::Api { message, context },
            ErrorKind::Parse => Error::Parse { message, context },
        }
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, msg, ErrorContext::new())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg, ErrorContext::new())
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::Validation, msg, context)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, msg, ErrorContext::new())
    }

    pub fn parse_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::Parse, msg, context)
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, msg, ErrorContext::new())
    }

    /// The taxonomy member this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth { .. } => ErrorKind::Auth,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Network { .. } => ErrorKind::Network,
            Error::Service { .. } => ErrorKind::Service,
            Error::Api { .. } => ErrorKind::Api,
            Error::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Machine code of the error kind (e.g. `"PARSE_ERROR"`).
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().retryable()
    }

    /// The human message, without the kind prefix or context suffix.
    pub fn message(&self) -> &str {
        match self {
            Error::Auth { message, .. }
            | Error::Validation { message, .. }
            | Error::RateLimit { message, .. }
            | Error::Timeout { message, .. }
            | Error::Network { message, .. }
            | Error::Service { message, .. }
            | Error::Api { message, .. }
            | Error::Parse { message, .. } => message,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Error::Auth { context, .. }
            | Error::Validation { context, .. }
            | Error::RateLimit { context, .. }
            | Error::Timeout { context, .. }
            | Error::Network { context, .. }
            | Error::Service { context, .. }
            | Error::Api { context, .. }
            | Error::Parse { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Error::Auth { context, .. }
            | Error::Validation { context, .. }
            | Error::RateLimit { context, .. }
            | Error::Timeout { context, .. }
            | Error::Network { context, .. }
            | Error::Service { context, .. }
            | Error::Api { context, .. }
            | Error::Parse { context, .. } => context,
        }
    }

    /// Provider retry-after guidance, only present on rate limit errors.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Error::RateLimit { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Attach the call's correlation id unless one is already set.
    pub(crate) fn with_request_id(mut self, id: &str) -> Self {
        let ctx = self.context_mut();
        if ctx.request_id.is_none() {
            ctx.request_id = Some(id.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::validation_with_context(
            "temperature must be between 0 and 2",
            ErrorContext::new()
                .with_field_path("parameters.temperature")
                .with_source("request_validator"),
        );
        assert_eq!(
            err.to_string(),
            "Validation error: temperature must be between 0 and 2 \
             (field: parameters.temperature, source: request_validator)"
        );
        assert_eq!(err.message(), "temperature must be between 0 and 2");
    }

    #[test]
    fn kind_drives_retryability() {
        let timeout = Error::new(ErrorKind::Timeout, "deadline", ErrorContext::new());
        assert!(timeout.is_retryable());
        assert_eq!(timeout.code(), "TIMEOUT_ERROR");

        let parse = Error::parse("bad json");
        assert!(!parse.is_retryable());
        assert_eq!(parse.kind(), ErrorKind::Parse);
    }

    #[test]
    fn request_id_is_not_overwritten() {
        let err = Error::new(
            ErrorKind::Api,
            "boom",
            ErrorContext::new().with_request_id("first"),
        )
        .with_request_id("second");
        assert_eq!(err.context().request_id.as_deref(), Some("first"));

        let err = Error::api("boom").with_request_id("only");
        assert_eq!(err.context().request_id.as_deref(), Some("only"));
    }

    #[test]
    fn retry_after_only_on_rate_limit() {
        let err = Error::RateLimit {
            message: "slow down".into(),
            retry_after_ms: Some(30_000),
            context: ErrorContext::new(),
        };
        assert_eq!(err.retry_after_ms(), Some(30_000));
        assert_eq!(Error::auth("nope").retry_after_ms(), None);
    }
}
