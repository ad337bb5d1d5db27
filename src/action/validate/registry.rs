// SPDX-License-Identifier: MIT

//! Registry of named custom validator handlers
//!
//! Schemas reference handlers by key; callers register them ahead of time,
//! before the action is built. A handler receives the value under check and
//! the settings object from the schema, and reports whether the value is
//! acceptable. Returning an error counts as a failed check, with the error
//! attached to the violation as its cause.

use crate::error::BoxError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved custom validator: `(value, settings) -> acceptable?`
pub type ValidatorHandler = Arc<dyn Fn(&Value, &Value) -> Result<bool, BoxError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    handlers: HashMap<String, ValidatorHandler>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&Value, &Value) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<ValidatorHandler> {
        self.handlers.get(name).cloned()
    }
}
