// SPDX-License-Identifier: MIT

//! Schema compilation
//!
//! Normalizes a raw section map into a single object-kind root node,
//! resolving custom validator handlers through the registry and rewriting
//! `x-` type tags into extended kinds. All malformed-schema conditions are
//! fatal `ConfigError`s raised here, at build time.

use super::types::{SchemaNode, ValidatorRef, EXTENDED_TYPE_PREFIX};
use crate::action::validate::{ValidatorHandler, ValidatorRegistry};
use crate::error::ConfigError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Compiled data-flow schema; the root is always object-kind and its
/// properties are the schema's sections.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub root: CompiledNode,
}

#[derive(Debug, Clone)]
pub struct CompiledNode {
    pub kind: CompiledKind,
    pub properties: HashMap<String, CompiledNode>,
    pub required: Vec<String>,
    pub default: Option<Value>,
    pub validator: Option<CompiledValidator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledKind {
    Object,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    /// Opaque type checked by tag identity; accepts `null` unconditionally
    Extended(String),
    /// No declared type; any value passes the type check
    Any,
}

#[derive(Clone)]
pub struct CompiledValidator {
    pub handler: ValidatorHandler,
    pub settings: Value,
    pub message: String,
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("settings", &self.settings)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Compile a section map into the schema the state engine walks.
pub fn compile_schema(
    sections: &HashMap<String, SchemaNode>,
    validators: &ValidatorRegistry,
) -> Result<CompiledSchema, ConfigError> {
    let mut properties = HashMap::new();

    for (name, fragment) in sections {
        let required_here = false; // sections themselves are never required
        properties.insert(
            name.clone(),
            compile_node(name, fragment, required_here, validators)?,
        );
    }

    Ok(CompiledSchema {
        root: CompiledNode {
            kind: CompiledKind::Object,
            properties,
            required: Vec::new(),
            default: None,
            validator: None,
        },
    })
}

fn compile_node(
    path: &str,
    raw: &SchemaNode,
    required_in_parent: bool,
    validators: &ValidatorRegistry,
) -> Result<CompiledNode, ConfigError> {
    let kind = parse_kind(raw.kind.as_deref());

    if kind == CompiledKind::Object && raw.default.is_some() {
        return Err(ConfigError::DefaultOnObject {
            path: path.to_string(),
        });
    }

    if required_in_parent && raw.default.is_some() {
        let name = path.rsplit('.').next().unwrap_or(path).to_string();
        return Err(ConfigError::RequiredWithDefault { name });
    }

    let validator = match &raw.validator {
        Some(reference) => Some(resolve_validator(reference, validators)?),
        None => None,
    };

    let mut properties = HashMap::new();
    if kind == CompiledKind::Object {
        for (name, child) in &raw.properties {
            let child_path = format!("{}.{}", path, name);
            let child_required = raw.required.iter().any(|r| r == name);
            properties.insert(
                name.clone(),
                compile_node(&child_path, child, child_required, validators)?,
            );
        }
    }

    Ok(CompiledNode {
        kind,
        properties,
        required: raw.required.clone(),
        default: raw.default.clone(),
        validator,
    })
}

fn parse_kind(tag: Option<&str>) -> CompiledKind {
    match tag {
        None => CompiledKind::Any,
        Some("object") => CompiledKind::Object,
        Some("boolean") => CompiledKind::Boolean,
        Some("integer") => CompiledKind::Integer,
        Some("number") => CompiledKind::Number,
        Some("string") => CompiledKind::String,
        Some("array") => CompiledKind::Array,
        Some(other) => match other.strip_prefix(EXTENDED_TYPE_PREFIX) {
            Some(extended) => CompiledKind::Extended(extended.to_string()),
            // Unknown tags behave like an absent type and fail nothing;
            // validation of the subset stops at the kinds listed above.
            None => CompiledKind::Any,
        },
    }
}

fn resolve_validator(
    reference: &ValidatorRef,
    validators: &ValidatorRegistry,
) -> Result<CompiledValidator, ConfigError> {
    let handler = validators
        .get(&reference.handler)
        .ok_or_else(|| ConfigError::UnknownValidator {
            name: reference.handler.clone(),
        })?;

    let message = reference
        .settings
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("rejected by custom validator '{}'", reference.handler));

    Ok(CompiledValidator {
        handler,
        settings: reference.settings.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_from_yaml(yaml: &str) -> HashMap<String, SchemaNode> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_compile_sections_into_object_root() {
        let sections = schema_from_yaml(
            r#"
            setInput:
              type: object
              properties:
                someProp: { type: string }
            step1: { type: integer }
        "#,
        );

        let compiled = compile_schema(&sections, &ValidatorRegistry::new()).unwrap();

        assert_eq!(compiled.root.kind, CompiledKind::Object);
        assert_eq!(compiled.root.properties.len(), 2);
        assert_eq!(
            compiled.root.properties["step1"].kind,
            CompiledKind::Integer
        );
        let set_input = &compiled.root.properties["setInput"];
        assert_eq!(set_input.kind, CompiledKind::Object);
        assert_eq!(
            set_input.properties["someProp"].kind,
            CompiledKind::String
        );
    }

    #[test]
    fn test_default_on_object_is_fatal() {
        let sections = schema_from_yaml(
            r#"
            step1:
              type: object
              default: {}
        "#,
        );

        let err = compile_schema(&sections, &ValidatorRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultOnObject { .. }));
    }

    #[test]
    fn test_required_with_default_is_fatal() {
        let sections = schema_from_yaml(
            r#"
            setInput:
              type: object
              properties:
                someProp: { type: string, default: oops }
              required: [someProp]
        "#,
        );

        let err = compile_schema(&sections, &ValidatorRegistry::new()).unwrap_err();
        match err {
            ConfigError::RequiredWithDefault { name } => assert_eq!(name, "someProp"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extended_type_rewrite() {
        let sections = schema_from_yaml("step1: { type: x-Function }");

        let compiled = compile_schema(&sections, &ValidatorRegistry::new()).unwrap();
        assert_eq!(
            compiled.root.properties["step1"].kind,
            CompiledKind::Extended("Function".to_string())
        );
    }

    #[test]
    fn test_unknown_validator_is_fatal() {
        let sections = schema_from_yaml(
            r#"
            step1:
              type: string
              validator:
                handler: never-registered
                settings: { message: nope }
        "#,
        );

        let err = compile_schema(&sections, &ValidatorRegistry::new()).unwrap_err();
        match err {
            ConfigError::UnknownValidator { name } => assert_eq!(name, "never-registered"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validator_resolution_keeps_settings_and_message() {
        let mut registry = ValidatorRegistry::new();
        registry.register("always", |_, _| Ok(true));

        let sections = schema_from_yaml(
            r#"
            step1:
              type: string
              validator:
                handler: always
                settings: { message: custom message, limit: 3 }
        "#,
        );

        let compiled = compile_schema(&sections, &registry).unwrap();
        let validator = compiled.root.properties["step1"].validator.as_ref().unwrap();
        assert_eq!(validator.message, "custom message");
        assert_eq!(validator.settings["limit"], 3);
    }

    #[test]
    fn test_missing_type_compiles_to_any() {
        let sections = schema_from_yaml("step1: {}");

        let compiled = compile_schema(&sections, &ValidatorRegistry::new()).unwrap();
        assert_eq!(compiled.root.properties["step1"].kind, CompiledKind::Any);
    }
}
