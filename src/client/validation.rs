//! 请求校验：在任何网络调用之前检查生成请求的结构合法性。
//!
//! Request validation.
//!
//! Purely local and total: every field is checked and every violated rule is
//! reported with its own message. The resulting [`Error::Validation`] carries
//! all violations, joined with `"; "`, and points at the first offending field.

use crate::structured::SchemaDescriptor;
use crate::types::{GenerationParameters, GenerationRequest};
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of each prompt, in Unicode scalar values (`char`s), so an
/// emoji outside the BMP counts once rather than as two UTF-16 units.
pub const MAX_MESSAGE_CHARS: usize = 50_000;

static MODEL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*/[A-Za-z0-9][A-Za-z0-9._:-]*$")
        .unwrap_or_else(|e| panic!("model name pattern is invalid: {e}"))
});

#[derive(Debug, Default)]
struct Violations {
    items: Vec<(String, String)>,
}

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.items.push((field.to_string(), message.into()));
    }

    fn into_result(self) -> Result<()> {
        let Some((first_field, _)) = self.items.first() else {
            return Ok(());
        };
        let first_field = first_field.clone();
        let message = self
            .items
            .into_iter()
            .map(|(_, m)| m)
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::validation_with_context(
            message,
            ErrorContext::new()
                .with_field_path(first_field)
                .with_source("request_validator"),
        ))
    }
}

/// Validate a request before any network activity.
pub fn validate_request(request: &GenerationRequest) -> Result<()> {
    let mut v = Violations::default();

    check_message(&mut v, "systemMessage", &request.system_message);
    check_message(&mut v, "userMessage", &request.user_message);

    if let Some(model) = &request.model_name {
        if !is_valid_model_name(model) {
            v.push(
                "modelName",
                format!(
                    "modelName \"{}\" must be in provider/model-identifier format",
                    model
                ),
            );
        }
    }

    if let Some(params) = &request.parameters {
        check_parameters(&mut v, params);
    }

    if let Some(schema) = &request.response_schema {
        check_schema(&mut v, schema);
    }

    v.into_result()
}

/// `provider/model-identifier`: exactly one `/`, both segments non-empty and
/// made of identifier-safe characters.
pub fn is_valid_model_name(model: &str) -> bool {
    MODEL_NAME.is_match(model)
}

fn check_message(v: &mut Violations, field: &str, value: &str) {
    if value.trim().is_empty() {
        v.push(field, format!("{} is required and cannot be empty", field));
    } else if value.chars().count() > MAX_MESSAGE_CHARS {
        v.push(
            field,
            format!(
                "{} exceeds maximum length of {} characters",
                field, MAX_MESSAGE_CHARS
            ),
        );
    }
}

fn check_range(v: &mut Violations, name: &str, value: Option<f64>, min: f64, max: f64) {
    let Some(value) = value else {
        return;
    };
    // NaN fails the containment check as well.
    if !(min..=max).contains(&value) {
        v.push(
            &format!("parameters.{}", name),
            format!("{} must be between {} and {}", name, min, max),
        );
    }
}

fn check_parameters(v: &mut Violations, params: &GenerationParameters) {
    check_range(v, "temperature", params.temperature, 0.0, 2.0);
    check_range(v, "top_p", params.top_p, 0.0, 1.0);
    check_range(v, "frequency_penalty", params.frequency_penalty, -2.0, 2.0);
    check_range(v, "presence_penalty", params.presence_penalty, -2.0, 2.0);

    if params.max_tokens == Some(0) {
        v.push("parameters.max_tokens", "max_tokens must be at least 1");
    }
}

fn check_schema(v: &mut Violations, schema: &SchemaDescriptor) {
    if schema.name.trim().is_empty() {
        v.push(
            "responseSchema.name",
            "responseSchema.name is required and cannot be empty",
        );
    }
    if schema.schema_type != "object" {
        v.push(
            "responseSchema.type",
            format!(
                "responseSchema.type must be \"object\", got \"{}\"",
                schema.schema_type
            ),
        );
    }
    if schema.properties.is_empty() {
        v.push(
            "responseSchema.properties",
            "responseSchema.properties must declare at least one property",
        );
    }
    for field in schema.required_fields() {
        if !schema.properties.contains_key(field) {
            v.push(
                "responseSchema.required",
                format!(
                    "responseSchema.required references undeclared property: {}",
                    field
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorKind;

    fn valid() -> GenerationRequest {
        GenerationRequest::new("You summarize notes.", "Notes: shipped v2.")
    }

    fn message_of(req: &GenerationRequest) -> String {
        let err = validate_request(req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        err.message().to_string()
    }

    #[test]
    fn accepts_minimal_request() {
        assert!(validate_request(&valid()).is_ok());
    }

    #[test]
    fn rejects_blank_messages() {
        let mut req = valid();
        req.system_message = "  \n\t".into();
        assert_eq!(
            message_of(&req),
            "systemMessage is required and cannot be empty"
        );

        let mut req = valid();
        req.user_message = String::new();
        assert_eq!(message_of(&req), "userMessage is required and cannot be empty");
    }

    #[test]
    fn rejects_oversized_messages_by_char_count() {
        let mut req = valid();
        req.user_message = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_request(&req).is_ok());

        req.user_message.push('x');
        assert_eq!(
            message_of(&req),
            "userMessage exceeds maximum length of 50000 characters"
        );
    }

    #[test]
    fn astral_characters_count_once() {
        let mut req = valid();
        req.system_message = "📝".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let mut req = valid();
        req.system_message = String::new();
        req.user_message = String::new();
        req.parameters = Some(GenerationParameters::new().temperature(3.0));

        let err = validate_request(&req).unwrap_err();
        let msg = err.message();
        assert!(msg.contains("systemMessage is required"));
        assert!(msg.contains("userMessage is required"));
        assert!(msg.contains("temperature must be between 0 and 2"));
        assert_eq!(err.context().field_path.as_deref(), Some("systemMessage"));
    }

    #[test]
    fn model_name_format() {
        for good in [
            "openai/gpt-4o-mini",
            "anthropic/claude-3.5-sonnet",
            "meta-llama/llama-3.1-8b-instruct:free",
        ] {
            assert!(is_valid_model_name(good), "{good} should be valid");
        }
        for bad in [
            "gpt-4o",
            "openai/",
            "/gpt-4o",
            "a/b/c",
            "open ai/gpt",
            "",
        ] {
            assert!(!is_valid_model_name(bad), "{bad} should be invalid");
            let req = valid().with_model(bad);
            assert!(message_of(&req).contains("provider/model-identifier"));
        }
    }

    #[test]
    fn parameter_bounds() {
        let ok = GenerationParameters::new()
            .temperature(2.0)
            .top_p(0.0)
            .frequency_penalty(-2.0)
            .presence_penalty(2.0)
            .max_tokens(1);
        assert!(validate_request(&valid().with_parameters(ok)).is_ok());

        let cases = [
            (GenerationParameters::new().temperature(-0.1), "temperature"),
            (GenerationParameters::new().top_p(1.5), "top_p"),
            (GenerationParameters::new().frequency_penalty(2.5), "frequency_penalty"),
            (GenerationParameters::new().presence_penalty(-3.0), "presence_penalty"),
            (GenerationParameters::new().max_tokens(0), "max_tokens"),
            (GenerationParameters::new().temperature(f64::NAN), "temperature"),
        ];
        for (params, name) in cases {
            let msg = message_of(&valid().with_parameters(params));
            assert!(msg.starts_with(name), "unexpected message: {msg}");
        }
    }

    #[test]
    fn schema_shape() {
        let mut schema = SchemaDescriptor::object("summary").required_property("text", "string");
        assert!(validate_request(&valid().with_schema(schema.clone())).is_ok());

        schema.name = " ".into();
        assert!(message_of(&valid().with_schema(schema.clone())).contains("name"));

        let mut schema = SchemaDescriptor::object("summary").property("text", "string");
        schema.schema_type = "array".into();
        assert!(message_of(&valid().with_schema(schema)).contains("must be \"object\""));

        let schema = SchemaDescriptor::object("summary");
        assert!(message_of(&valid().with_schema(schema)).contains("at least one property"));

        let mut schema = SchemaDescriptor::object("summary").property("text", "string");
        schema.required = Some(vec!["missing".into()]);
        assert!(message_of(&valid().with_schema(schema)).contains("undeclared property: missing"));
    }
}
