// SPDX-License-Identifier: MIT

//! Conditions handed to the front controller
//!
//! The condition provider runs once at build time against the live state
//! handle and returns named predicates; the front controller consults them
//! to decide which steps to invoke.

use crate::error::{ConfigError, FlowError};
use std::collections::HashMap;
use std::sync::Arc;

/// A named predicate, typically a closure capturing the `StateHandle`
pub type ConditionFn = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct Conditions {
    conditions: HashMap<String, ConditionFn>,
}

impl Conditions {
    pub(crate) fn new(conditions: HashMap<String, ConditionFn>) -> Self {
        Self { conditions }
    }

    /// Evaluate a condition by name.
    pub fn is_met(&self, name: &str) -> Result<bool, FlowError> {
        let condition = self.conditions.get(name).ok_or(ConfigError::UnknownCondition {
            name: name.to_string(),
        })?;
        Ok(condition())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }
}
