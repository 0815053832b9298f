//! Output validator for structured responses.
//!
//! A deliberately small type matcher, not a JSON Schema engine:
//! - required fields must be present
//! - declared properties that are present must match their declared kind
//!   (string, number, boolean, array, object, null)
//! - unknown declared kinds are accepted as-is
//! - undeclared fields pass through unchecked

use crate::structured::schema::SchemaDescriptor;
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};

/// Declared primitive kind of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
    /// Any other declared type string; matches every value
    Other(String),
}

impl FieldType {
    pub fn parse(declared: &str) -> Self {
        match declared {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "array" => FieldType::Array,
            "object" => FieldType::Object,
            "null" => FieldType::Null,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Null => value.is_null(),
            FieldType::Other(_) => true,
        }
    }
}

/// Runtime kind name of a JSON value, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

/// Validator bound to one schema descriptor.
pub struct OutputValidator<'a> {
    schema: &'a SchemaDescriptor,
}

impl<'a> OutputValidator<'a> {
    pub fn new(schema: &'a SchemaDescriptor) -> Self {
        Self { schema }
    }

    /// Check a parsed object against the schema.
    ///
    /// Required fields are checked first, in declaration order of `required`;
    /// the first violation is returned as a [`Error::Parse`].
    pub fn validate(&self, data: &Map<String, Value>) -> Result<()> {
        for field in self.schema.required_fields() {
            if !data.contains_key(field) {
                return Err(Error::parse_with_context(
                    format!("Missing required field: {}", field),
                    ErrorContext::new()
                        .with_field_path(field.clone())
                        .with_source("schema_validator"),
                ));
            }
        }

        for (name, value) in data {
            let Some(declared) = self.schema.properties.get(name) else {
                continue;
            };
            let expected = FieldType::parse(&declared.property_type);
            if !expected.matches(value) {
                return Err(Error::parse_with_context(
                    format!("Field \"{}\" has incorrect type", name),
                    ErrorContext::new()
                        .with_field_path(name.clone())
                        .with_details(format!(
                            "expected {}, got {}",
                            declared.property_type,
                            value_kind(value)
                        ))
                        .with_source("schema_validator"),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorKind;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn person_schema() -> SchemaDescriptor {
        SchemaDescriptor::object("person")
            .required_property("name", "string")
            .required_property("age", "number")
    }

    #[test]
    fn accepts_conforming_object() {
        let schema = person_schema();
        let data = object(json!({"name": "John", "age": 42, "extra": [1, 2]}));
        assert!(OutputValidator::new(&schema).validate(&data).is_ok());
    }

    #[test]
    fn reports_missing_required_field() {
        let schema = person_schema();
        let data = object(json!({"name": "John"}));
        let err = OutputValidator::new(&schema).validate(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.message(), "Missing required field: age");
    }

    #[test]
    fn reports_type_mismatch_with_details() {
        let schema = person_schema();
        let data = object(json!({"name": "John", "age": "25"}));
        let err = OutputValidator::new(&schema).validate(&data).unwrap_err();
        assert_eq!(err.message(), "Field \"age\" has incorrect type");
        assert_eq!(
            err.context().details.as_deref(),
            Some("expected number, got string")
        );
    }

    #[test]
    fn optional_fields_may_be_absent_but_must_match_when_present() {
        let schema = SchemaDescriptor::object("s").property("label", "string");
        let validator = OutputValidator::new(&schema);
        assert!(validator.validate(&object(json!({}))).is_ok());
        assert!(validator.validate(&object(json!({"label": 3}))).is_err());
    }

    #[test]
    fn field_type_matching() {
        assert!(FieldType::parse("array").matches(&json!([])));
        assert!(!FieldType::parse("array").matches(&json!({})));
        assert!(FieldType::parse("object").matches(&json!({})));
        assert!(!FieldType::parse("object").matches(&json!([])));
        assert!(FieldType::parse("null").matches(&Value::Null));
        assert!(FieldType::parse("number").matches(&json!(1.5)));
        assert!(FieldType::parse("boolean").matches(&json!(false)));
        assert!(FieldType::parse("integer").matches(&json!("anything")));
    }
}
