//! # notes-ai
//!
//! 面向会议笔记摘要的强类型、具备容错能力的大模型对话补全客户端。
//!
//! A resilient, typed chat-completion client that turns raw meeting notes into
//! structured summaries.
//!
//! ## Overview
//!
//! One call, [`GenerationClient::generate`], runs the whole pipeline:
//!
//! validate → retry loop (invoke → classify) → parse → fire telemetry → return
//!
//! - **Fail fast**: malformed requests are rejected before any network I/O
//! - **Bounded retries**: only timeouts, network failures and 5xx responses are
//!   retried, with deterministic exponential backoff
//! - **Typed failures**: every failure is an [`Error`] with a stable code
//! - **Structured output**: schema-bearing requests return a checked JSON object
//! - **Best-effort telemetry**: usage rows go to an optional [`UsageSink`] on a
//!   detached task and never affect the result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notes_ai::{GenerationClient, GenerationRequest, SchemaDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> notes_ai::Result<()> {
//!     let client = GenerationClient::builder()
//!         .api_key("sk-or-...")
//!         .build()?;
//!
//!     let schema = SchemaDescriptor::object("meeting_summary")
//!         .required_property("summary", "string")
//!         .property("goal_met", "boolean");
//!
//!     let result = client
//!         .generate(
//!             GenerationRequest::new("Summarize the notes.", "Notes: shipped v2.")
//!                 .with_schema(schema),
//!         )
//!         .await?;
//!     println!("{:?} ({} tokens)", result.data, result.metadata.tokens_used);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Validation, retry loop, classification, parsing |
//! | [`config`] | Client configuration and env loading |
//! | [`structured`] | Schema descriptors and output validation |
//! | [`telemetry`] | Usage records and sinks |
//! | [`transport`] | Single-attempt HTTP transport |
//! | [`types`] | Request, wire and result types |

pub mod client;
pub mod config;
pub mod error_code;
pub mod structured;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{GenerationClient, GenerationClientBuilder, RetryPolicy};
pub use config::{AppIdentity, ClientConfig};
pub use error_code::ErrorKind;
pub use structured::{JsonMode, PropertySchema, SchemaDescriptor};
pub use telemetry::{UsageRecord, UsageSink, UsageStatus};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{
    GeneratedContent, GenerationMetadata, GenerationParameters, GenerationRequest,
    GenerationResult,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
