// SPDX-License-Identifier: MIT

//! Schema checker
//!
//! Validates a full state snapshot against the compiled schema. The walk
//! collects every violation rather than stopping at the first, so a failed
//! invocation reports the complete picture. Absent keys are only flagged
//! when the enclosing node requires them; present keys are checked for type,
//! extended-type tag identity, and custom validator acceptance.

use crate::action::schema::{opaque_type_of, CompiledKind, CompiledNode, CompiledSchema};
use crate::error::{ValidationError, Violation, ViolationKind};
use serde_json::Value;

/// Validate a state snapshot; `Err` carries all violations found.
pub fn validate_state(schema: &CompiledSchema, state: &Value) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    check_node(&schema.root, state, "", &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn check_node(node: &CompiledNode, value: &Value, path: &str, out: &mut Vec<Violation>) {
    if let Some(custom) = &node.validator {
        match (custom.handler)(value, &custom.settings) {
            Ok(true) => {}
            Ok(false) => out.push(Violation {
                path: path.to_string(),
                kind: ViolationKind::Custom,
                message: custom.message.clone(),
                cause: None,
            }),
            Err(err) => out.push(Violation {
                path: path.to_string(),
                kind: ViolationKind::Custom,
                message: custom.message.clone(),
                cause: Some(err.to_string()),
            }),
        }
    }

    match &node.kind {
        CompiledKind::Object => {
            let Some(object) = value.as_object() else {
                out.push(type_violation(path, "object"));
                return;
            };

            for name in &node.required {
                if !object.contains_key(name) {
                    out.push(Violation {
                        path: join(path, name),
                        kind: ViolationKind::Required,
                        message: format!("should have required property '{}'", name),
                        cause: None,
                    });
                }
            }

            for (name, child) in &node.properties {
                if let Some(child_value) = object.get(name) {
                    check_node(child, child_value, &join(path, name), out);
                }
            }
        }
        CompiledKind::Boolean => {
            if !value.is_boolean() {
                out.push(type_violation(path, "boolean"));
            }
        }
        CompiledKind::Integer => {
            if !value.is_i64() && !value.is_u64() {
                out.push(type_violation(path, "integer"));
            }
        }
        CompiledKind::Number => {
            if !value.is_number() {
                out.push(type_violation(path, "number"));
            }
        }
        CompiledKind::String => {
            if !value.is_string() {
                out.push(type_violation(path, "string"));
            }
        }
        CompiledKind::Array => {
            if !value.is_array() {
                out.push(type_violation(path, "array"));
            }
        }
        CompiledKind::Extended(name) => {
            let matches_tag = opaque_type_of(value) == Some(name.as_str());
            if !value.is_null() && !matches_tag {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::ExtendedType,
                    message: format!("should be {}", name),
                    cause: None,
                });
            }
        }
        CompiledKind::Any => {}
    }
}

fn type_violation(path: &str, expected: &str) -> Violation {
    Violation {
        path: path.to_string(),
        kind: ViolationKind::Type,
        message: format!("should be {}", expected),
        cause: None,
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
