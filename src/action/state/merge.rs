// SPDX-License-Identifier: MIT

//! State merging
//!
//! Folds an incoming value into one section of the state tree, following the
//! shape of the schema. The merger assigns first and lets the validator
//! enforce type correctness immediately afterwards: an intermediate state may
//! transiently be invalid, but validation always runs right after a merge.
//!
//! Per-property rules, mirroring the shape of the schema:
//! - absent incoming value: declared default if any, otherwise the key is
//!   dropped so a `required` check fails on the next validation pass
//! - explicit `null`: reset to a truthy declared default, else the type zero
//! - anything else: assigned verbatim
//! - object-kind properties recurse only for JSON-object values on nodes
//!   that declare at least one property; everything else is assigned raw so
//!   validation reports the mismatch instead of it being swallowed

use super::{is_truthy, zero_value};
use crate::action::schema::{CompiledKind, CompiledNode, CompiledSchema};
use serde_json::{Map, Value};

/// Merge `incoming` into the named top-level section of `state`.
///
/// `None` carries the source's "no value produced" semantics: the section
/// falls back to its default or is dropped for validation to flag.
pub fn merge_section(
    schema: &CompiledSchema,
    state: &mut Value,
    section: &str,
    incoming: Option<&Value>,
) {
    let Some(state_obj) = state.as_object_mut() else {
        return;
    };

    let Some(node) = schema.root.properties.get(section) else {
        log::warn!("merge targeted undeclared section '{}'", section);
        return;
    };

    log::debug!("merging result into section '{}'", section);
    merge_property(node, state_obj, section, incoming);
}

fn merge_object(node: &CompiledNode, state_obj: &mut Map<String, Value>, incoming: &Value) {
    for (name, child) in &node.properties {
        merge_property(child, state_obj, name, incoming.get(name));
    }
}

fn merge_property(
    node: &CompiledNode,
    state_obj: &mut Map<String, Value>,
    name: &str,
    incoming: Option<&Value>,
) {
    if node.kind != CompiledKind::Object {
        merge_scalar(node, state_obj, name, incoming);
        return;
    }

    let is_plain_object = matches!(incoming, Some(Value::Object(_)));
    if !is_plain_object || node.properties.is_empty() {
        // Raw assignment; a non-object where an object is expected surfaces
        // as a type violation on the next validation pass.
        match incoming {
            Some(value) => {
                state_obj.insert(name.to_string(), value.clone());
            }
            None => {
                state_obj.remove(name);
            }
        }
        return;
    }

    let slot = state_obj
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let (Value::Object(nested_state), Some(value)) = (slot, incoming) {
        merge_object(node, nested_state, value);
    }
}

fn merge_scalar(
    node: &CompiledNode,
    state_obj: &mut Map<String, Value>,
    name: &str,
    incoming: Option<&Value>,
) {
    let Some(value) = incoming else {
        match &node.default {
            Some(default) => {
                state_obj.insert(name.to_string(), default.clone());
            }
            None => {
                state_obj.remove(name);
            }
        }
        return;
    };

    if !value.is_null() {
        state_obj.insert(name.to_string(), value.clone());
        return;
    }

    // Explicit null is a reset-to-initial request. A falsy default behaves
    // as if absent, matching the source's semantics exactly.
    let reset = match &node.default {
        Some(default) if is_truthy(default) => default.clone(),
        _ => zero_value(&node.kind),
    };
    state_obj.insert(name.to_string(), reset);
}
