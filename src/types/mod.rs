//! 类型模块：生成请求、线上报文与生成结果的数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of everything that crosses the client
//! boundary: the caller's [`GenerationRequest`], the chat-completion wire
//! payloads, and the [`GenerationResult`] handed back on success.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GenerationRequest`] | Prompts, optional schema and generation knobs |
//! | [`GenerationParameters`] | Optional numeric sampling parameters |
//! | [`ChatMessage`] | One `{role, content}` entry of the outbound payload |
//! | [`ChatCompletionResponse`] | Decoded success body of the endpoint |
//! | [`GenerationResult`] | Parsed data plus call metadata |
//!
//! ## Example
//!
//! ```rust
//! use notes_ai::types::{GenerationParameters, GenerationRequest};
//!
//! let request = GenerationRequest::new(
//!     "You summarize meeting notes.",
//!     "Discussed Q3 roadmap; launch slipped one week.",
//! )
//! .with_model("anthropic/claude-3.5-sonnet")
//! .with_parameters(GenerationParameters::new().temperature(0.2).max_tokens(800));
//!
//! assert_eq!(request.model_name.as_deref(), Some("anthropic/claude-3.5-sonnet"));
//! ```

pub mod message;
pub mod request;
pub mod response;

pub use message::{ChatMessage, MessageRole};
pub use request::{ChatCompletionRequest, GenerationParameters, GenerationRequest};
pub use response::{
    ChatCompletionResponse, Choice, GeneratedContent, GenerationMetadata, GenerationResult,
    ResponseMessage, Usage,
};
