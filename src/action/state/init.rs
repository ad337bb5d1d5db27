// SPDX-License-Identifier: MIT

//! State initialization
//!
//! Builds a state tree whose shape mirrors the compiled schema exactly:
//! every declared field exists, even if never written. The reserved
//! `setInput` and `getResult` sections exist regardless of the schema.
//! Runs once at build time and again at the start of every invocation.

use crate::action::schema::{CompiledKind, CompiledNode, CompiledSchema};
use crate::action::{GET_RESULT, SET_INPUT};
use serde_json::{Map, Number, Value};

pub fn init_state(schema: &CompiledSchema) -> Value {
    let mut root = Map::new();
    root.insert(SET_INPUT.to_string(), Value::Object(Map::new()));
    root.insert(GET_RESULT.to_string(), Value::Object(Map::new()));

    for (name, node) in &schema.root.properties {
        root.insert(name.clone(), init_node(node));
    }

    Value::Object(root)
}

fn init_node(node: &CompiledNode) -> Value {
    match &node.kind {
        CompiledKind::Object => {
            let mut map = Map::new();
            for (name, child) in &node.properties {
                map.insert(name.clone(), init_node(child));
            }
            Value::Object(map)
        }
        CompiledKind::Boolean => Value::Bool(node.default.as_ref().map_or(false, is_truthy)),
        CompiledKind::Integer | CompiledKind::Number => match &node.default {
            Some(default) => to_number(default),
            None => Value::Number(0.into()),
        },
        CompiledKind::String => match &node.default {
            Some(Value::Null) | None => Value::String(String::new()),
            Some(default) => to_coerced_string(default),
        },
        // A non-array default is silently discarded here; the merger, by
        // contrast, assigns it verbatim on a null-reset and lets validation
        // flag it.
        CompiledKind::Array => match &node.default {
            Some(default @ Value::Array(_)) => default.clone(),
            _ => Value::Array(Vec::new()),
        },
        CompiledKind::Extended(_) | CompiledKind::Any => {
            node.default.clone().unwrap_or(Value::Null)
        }
    }
}

/// Type-appropriate zero used when a `null` resets a field with no usable
/// default.
pub(crate) fn zero_value(kind: &CompiledKind) -> Value {
    match kind {
        CompiledKind::Object => Value::Object(Map::new()),
        CompiledKind::Boolean => Value::Bool(false),
        CompiledKind::Integer | CompiledKind::Number => Value::Number(0.into()),
        CompiledKind::String => Value::String(String::new()),
        CompiledKind::Array => Value::Array(Vec::new()),
        CompiledKind::Extended(_) | CompiledKind::Any => Value::Null,
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::Bool(true) => Value::Number(1.into()),
        // Unparseable strings map to 0 (JSON numbers cannot hold NaN)
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .map(|i| Value::Number(i.into()))
            .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number))
            .unwrap_or_else(|| Value::Number(0.into())),
        _ => Value::Number(0.into()),
    }
}

fn to_coerced_string(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}
