// SPDX-License-Identifier: MIT

//! Live state handle
//!
//! Step bodies and condition closures capture a `StateHandle` when the
//! providers run at build time, and read through it while the action is in
//! flight. The mutex exists so the handle is `Send + Sync`; the engine
//! assumes a single in-flight invocation per built action and adds no
//! ordering guarantees of its own.

use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<Value>>,
}

impl StateHandle {
    pub(crate) fn new(initial: Value) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Clone the full state tree.
    pub fn snapshot(&self) -> Value {
        self.with(|state| state.clone())
    }

    /// Clone one top-level section.
    pub fn section(&self, name: &str) -> Option<Value> {
        self.with(|state| state.get(name).cloned())
    }

    /// Read a nested value using dot notation (e.g. `setInput.address.postcode`).
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.with(|state| {
            let mut current = &*state;
            for part in path.split('.') {
                current = current.get(part)?;
            }
            Some(current.clone())
        })
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut guard = self.inner.lock().expect("state mutex poisoned");
        f(&mut guard)
    }
}
