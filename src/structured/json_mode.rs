//! JSON mode support for structured output.
//!
//! Decides which `response_format` a schema-bearing request sends to the
//! provider (OpenAI-compatible chat-completion format).

use crate::structured::schema::SchemaDescriptor;

/// JSON mode options for structured output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JsonMode {
    /// Provider guarantees a JSON object; shape is checked locally
    #[default]
    Json,

    /// Provider is additionally handed the schema
    JsonSchema,
}

impl JsonMode {
    /// Get the string representation for API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonMode::Json => "json_object",
            JsonMode::JsonSchema => "json_schema",
        }
    }

    /// Build the `response_format` value for a schema.
    ///
    /// `strict` is set only when every property is required.
    ///
    /// Example output for JSON Schema mode:
    /// ```json
    /// {
    ///   "type": "json_schema",
    ///   "json_schema": { "name": "summary", "strict": true, "schema": { ... } }
    /// }
    /// ```
    pub fn response_format(&self, schema: &SchemaDescriptor) -> serde_json::Value {
        match self {
            JsonMode::Json => serde_json::json!({ "type": self.as_str() }),
            JsonMode::JsonSchema => serde_json::json!({
                "type": self.as_str(),
                "json_schema": {
                    "name": schema.name,
                    "strict": schema.all_properties_required(),
                    "schema": schema.to_json_schema()
                }
            }),
        }
    }
}

impl std::fmt::Display for JsonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JsonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json_object" | "json" => Ok(JsonMode::Json),
            "json_schema" => Ok(JsonMode::JsonSchema),
            _ => Err(format!("Unknown JSON mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_format() {
        let schema = SchemaDescriptor::object("s").property("a", "string");
        assert_eq!(
            JsonMode::Json.response_format(&schema),
            json!({"type": "json_object"})
        );
    }

    #[test]
    fn json_schema_format_embeds_schema() {
        let schema = SchemaDescriptor::object("summary").required_property("text", "string");
        let fmt = JsonMode::JsonSchema.response_format(&schema);
        assert_eq!(fmt["type"], "json_schema");
        assert_eq!(fmt["json_schema"]["name"], "summary");
        assert_eq!(fmt["json_schema"]["strict"], true);
        assert_eq!(fmt["json_schema"]["schema"]["required"], json!(["text"]));
        assert_eq!(fmt["json_schema"]["schema"]["additionalProperties"], false);
    }

    #[test]
    fn optional_property_turns_strict_off() {
        let schema = SchemaDescriptor::object("summary")
            .required_property("text", "string")
            .property("label", "string");
        let fmt = JsonMode::JsonSchema.response_format(&schema);
        assert_eq!(fmt["json_schema"]["strict"], false);
        assert_eq!(fmt["json_schema"]["schema"]["required"], json!(["text"]));
        assert_eq!(fmt["json_schema"]["schema"]["additionalProperties"], false);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("json_object".parse::<JsonMode>().unwrap(), JsonMode::Json);
        assert_eq!("json_schema".parse::<JsonMode>().unwrap(), JsonMode::JsonSchema);
        assert!("yaml".parse::<JsonMode>().is_err());
        assert_eq!(JsonMode::JsonSchema.to_string(), "json_schema");
    }
}
