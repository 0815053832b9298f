//! Error kinds: the closed taxonomy of failures a generation call can end in.
//!
//! Every [`crate::Error`] belongs to exactly one [`ErrorKind`]. The kind carries
//! the metadata that policy code needs (retryability, machine code) so callers
//! never have to match on individual error variants to decide what to do.
//!
//! | Kind         | Code               | Retryable | Boundary status |
//! |--------------|--------------------|-----------|-----------------|
//! | Auth         | `AUTH_ERROR`       | no        | 503             |
//! | Validation   | `VALIDATION_ERROR` | no        | 400             |
//! | RateLimit    | `RATE_LIMIT_ERROR` | no        | 429             |
//! | Timeout      | `TIMEOUT_ERROR`    | yes       | 504             |
//! | Network      | `NETWORK_ERROR`    | yes       | 503             |
//! | Service      | `SERVICE_ERROR`    | yes       | 503             |
//! | Api          | `API_ERROR`        | no        | 503             |
//! | Parse        | `PARSE_ERROR`      | no        | 500             |
//!
//! ## Example
//!
//! ```rust
//! use notes_ai::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(503);
//! assert_eq!(kind.code(), "SERVICE_ERROR");
//! assert!(kind.retryable());
//! ```

use std::fmt;

/// Distinguishable failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or rejected credentials (local config, 401, 403)
    Auth,
    /// Malformed request, flagged locally or by the provider (400)
    Validation,
    /// Provider rate limit (429)
    RateLimit,
    /// Attempt deadline exceeded or call cancelled
    Timeout,
    /// Connection-level failure (DNS, refused, reset)
    Network,
    /// Provider-side 5xx
    Service,
    /// Unclassified HTTP status or unexpected failure
    Api,
    /// Provider answered but the payload was unusable
    Parse,
}

impl ErrorKind {
    /// Machine-readable code (e.g. `"TIMEOUT_ERROR"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Timeout => "TIMEOUT_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Service => "SERVICE_ERROR",
            Self::Api => "API_ERROR",
            Self::Parse => "PARSE_ERROR",
        }
    }

    /// Short human label, used in fallback messages such as `"Auth API error (401)"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "Auth",
            Self::Validation => "Validation",
            Self::RateLimit => "Rate limit",
            Self::Timeout => "Timeout",
            Self::Network => "Network",
            Self::Service => "Service",
            Self::Api => "API",
            Self::Parse => "Parse",
        }
    }

    /// Whether a failed attempt of this kind may be retried by the client.
    ///
    /// Rate limits are deliberately excluded: the caller decides whether to
    /// honour the provider's retry-after guidance.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network | Self::Service)
    }

    /// Suggested HTTP status for an application surfacing this error to its own caller.
    pub fn http_status_hint(&self) -> u16 {
        match self {
            Self::Auth | Self::Network | Self::Service | Self::Api => 503,
            Self::Timeout => 504,
            Self::RateLimit => 429,
            Self::Validation => 400,
            Self::Parse => 500,
        }
    }

    /// Maps a non-2xx HTTP status to the kind it is classified as.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            400 => Self::Validation,
            429 => Self::RateLimit,
            500..=599 => Self::Service,
            _ => Self::Api,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
