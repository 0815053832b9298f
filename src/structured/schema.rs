//! Schema descriptors for structured output.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Object-rooted schema a structured response must conform to.
///
/// Only the shape needed for the type matcher is modelled: a name, the
/// literal root type `"object"`, declared properties and the required subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// Declared type of a single property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySchema {
    pub fn new(property_type: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl SchemaDescriptor {
    /// Start an object schema with no properties.
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: None,
        }
    }

    /// Declare an optional property.
    pub fn property(mut self, name: impl Into<String>, property_type: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), PropertySchema::new(property_type));
        self
    }

    /// Declare a property with a full [`PropertySchema`].
    pub fn property_schema(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declare a property and mark it required.
    pub fn required_property(
        mut self,
        name: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.properties
            .insert(name.clone(), PropertySchema::new(property_type));
        self.required.get_or_insert_with(Vec::new).push(name);
        self
    }

    /// Names of required properties; empty when `required` was omitted.
    pub fn required_fields(&self) -> &[String] {
        self.required.as_deref().unwrap_or(&[])
    }

    /// True when every declared property is listed as required.
    pub fn all_properties_required(&self) -> bool {
        let required = self.required_fields();
        self.properties.keys().all(|name| required.contains(name))
    }

    /// Render as a JSON schema document that rejects undeclared properties.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for (name, prop) in &self.properties {
            let mut entry = serde_json::Map::new();
            entry.insert("type".into(), json!(prop.property_type));
            if let Some(desc) = &prop.description {
                entry.insert("description".into(), json!(desc));
            }
            properties.insert(name.clone(), entry.into());
        }

        json!({
            "type": self.schema_type,
            "properties": properties,
            "required": self.required_fields(),
            "additionalProperties": false,
        })
    }
}
