// SPDX-License-Identifier: MIT

//! Action composition engine
//!
//! This module provides:
//! - `schema` - declarative per-step schemas and their compiled form
//! - `state` - the shared state tree: initialization, live handle, merging
//! - `validate` - full-tree validation against the compiled schema
//! - `step` / `conditions` / `controller` - the pieces handed to the front
//!   controller at invocation time
//! - `builder` / `executor` - wiring and the per-invocation cycle

pub mod builder;
pub mod conditions;
pub mod controller;
pub mod executor;
pub mod receiver;
pub mod schema;
pub mod state;
pub mod step;
pub mod validate;

/// Reserved section holding the action's incoming arguments.
pub const SET_INPUT: &str = "setInput";

/// Reserved section holding the folded action result.
pub const GET_RESULT: &str = "getResult";
