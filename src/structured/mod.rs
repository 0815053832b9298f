//! Structured output module.
//!
//! Provides the schema descriptor, the JSON mode sent to the provider, and the
//! small type matcher that checks parsed responses:
//! - `SchemaDescriptor`: object schema with declared property kinds
//! - `JsonMode`: which `response_format` a schema-bearing request uses
//! - `OutputValidator`: required-field and type checks
//!
//! # Examples
//!
//! ```
//! use notes_ai::structured::{OutputValidator, SchemaDescriptor};
//! use serde_json::json;
//!
//! let schema = SchemaDescriptor::object("person")
//!     .required_property("name", "string")
//!     .property("age", "number");
//!
//! let data = json!({"name": "Alice", "age": 30});
//! let result = OutputValidator::new(&schema).validate(data.as_object().unwrap());
//!
//! assert!(result.is_ok());
//! ```

pub mod json_mode;
pub mod schema;
pub mod validator;

pub use json_mode::JsonMode;
pub use schema::{PropertySchema, SchemaDescriptor};
pub use validator::{FieldType, OutputValidator};
