// SPDX-License-Identifier: MIT

//! Raw schema definitions
//!
//! A data-flow schema is a mapping from section name (a step name, or the
//! reserved `setInput` / `getResult`) to a schema fragment. Fragments load
//! from JSON or YAML through serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Type tags carrying this prefix describe extended (non-JSON) types,
/// checked by tag identity rather than primitive shape.
pub const EXTENDED_TYPE_PREFIX: &str = "x-";

/// Key under which an opaque state value carries its extended type name.
pub const OPAQUE_TYPE_KEY: &str = "$type";

/// Mapping from section name to schema fragment
pub type SchemaMap = HashMap<String, SchemaNode>;

/// One field of a data-flow schema
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SchemaNode {
    /// Declared type: object, boolean, integer, number, string, array, or
    /// an `x-`-prefixed extended type name. Absent means "anything".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Nested fields (object kind only)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, SchemaNode>,

    /// Names of nested fields that must be present (object kind only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Default value (non-object kinds only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Optional custom check on this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorRef>,
}

/// Reference to a registered custom validator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidatorRef {
    /// Registry key of the handler
    pub handler: String,
    /// Handler settings, passed through verbatim; `settings.message` is used
    /// as the violation message on failure.
    #[serde(default)]
    pub settings: Value,
}

/// Build an opaque state value carrying an extended type tag.
///
/// The source of a value that is not JSON-representable (a callable, a
/// connection handle, ...) stores this tagged marker in state instead; the
/// validator matches the tag against the declared `x-<Name>` type.
pub fn opaque_value(type_name: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(
        OPAQUE_TYPE_KEY.to_string(),
        Value::String(type_name.to_string()),
    );
    Value::Object(map)
}

/// Extract the extended type tag of an opaque state value, if any.
pub fn opaque_type_of(value: &Value) -> Option<&str> {
    value.get(OPAQUE_TYPE_KEY)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_map_deserialize_from_yaml() {
        let yaml = r#"
            setInput:
              type: object
              properties:
                someProp:
                  type: string
                  default: some string
              required: [someProp]
            step1:
              type: integer
            getResult:
              type: object
              properties:
                counter:
                  type: number
        "#;
        let schema: SchemaMap = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(schema.len(), 3);
        let set_input = &schema["setInput"];
        assert_eq!(set_input.kind.as_deref(), Some("object"));
        assert_eq!(set_input.required, vec!["someProp"]);
        assert_eq!(
            set_input.properties["someProp"].default,
            Some(json!("some string"))
        );
        assert_eq!(schema["step1"].kind.as_deref(), Some("integer"));
    }

    #[test]
    fn test_validator_ref_deserialize() {
        let yaml = r#"
            type: string
            validator:
              handler: postcode-format
              settings:
                message: malformed postcode
                pattern: "^[A-Z]+$"
        "#;
        let node: SchemaNode = serde_yaml::from_str(yaml).unwrap();

        let validator = node.validator.unwrap();
        assert_eq!(validator.handler, "postcode-format");
        assert_eq!(validator.settings["message"], "malformed postcode");
        assert_eq!(validator.settings["pattern"], "^[A-Z]+$");
    }

    #[test]
    fn test_extended_type_tag_round_trip() {
        let value = opaque_value("Function");
        assert_eq!(opaque_type_of(&value), Some("Function"));
        assert_eq!(opaque_type_of(&json!({"other": 1})), None);
        assert_eq!(opaque_type_of(&json!(null)), None);
    }
}
