//! Recursive JSON-Schema-shaped model for tool inputs.
//!
//! [`JsonSchema`] is the dialect-neutral schema value the compiler emits and
//! the invocation engine reads. [`RawSchema`] is the wire form shared by both
//! document dialects; the document layer converts it, dropping unresolved
//! `$ref` nodes the same way the rest of the system treats absent schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A JSON-compatible type shape.
///
/// Only schemas with `type: "object"` meaningfully carry `properties` and
/// `required`; conversion from the wire form never populates them otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl JsonSchema {
    /// An empty object schema, the root shape of every tool input.
    pub fn object() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            ..Self::default()
        }
    }

    /// A schema carrying just a type name.
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            schema_type: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Whether this schema describes an object.
    pub fn is_object(&self) -> bool {
        self.schema_type.as_deref() == Some("object")
    }

    /// Render as a generic JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Render as a JSON object map (for transports that want `Map` roots).
    pub fn to_object_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match self.to_value() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Schema node as it appears in a description document.
///
/// Identical layout in both dialects. A node may be a `$ref` instead of an
/// inline schema; whoever converts it decides how references are handled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    pub format: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, RawSchema>,

    pub items: Option<Box<RawSchema>>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    pub default: Option<serde_json::Value>,
}

impl RawSchema {
    /// Convert to the dialect-neutral model.
    ///
    /// Properties and items that are themselves unresolved references are
    /// dropped, matching the permissive behavior for absent schemas.
    pub fn to_schema(&self) -> JsonSchema {
        let properties = self
            .properties
            .iter()
            .filter(|(_, prop)| prop.reference.is_none())
            .map(|(name, prop)| (name.clone(), prop.to_schema()))
            .collect();

        let items = self
            .items
            .as_ref()
            .filter(|items| items.reference.is_none())
            .map(|items| Box::new(items.to_schema()));

        JsonSchema {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            description: self.description.clone(),
            properties,
            items,
            required: self.required.clone(),
            enum_values: self.enum_values.clone(),
            default: self.default.clone(),
        }
    }
}
