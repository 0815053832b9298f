//! Typed generation client.
//!
//! Keep the public surface small: build a [`GenerationClient`], call
//! `generate`. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;
mod execution;
pub mod parser;
pub mod policy;
pub mod validation;

pub use builder::GenerationClientBuilder;
pub use core::GenerationClient;
pub use error_classification::{classify, classify_status};
pub use parser::parse_completion;
pub use policy::{Decision, RetryPolicy};
pub use validation::{is_valid_model_name, validate_request, MAX_MESSAGE_CHARS};
