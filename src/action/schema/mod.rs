// SPDX-License-Identifier: MIT

//! Data-flow schemas
//!
//! `types` holds the raw serde-loadable schema nodes; `compile` normalizes a
//! section map into the compiled tree the state engine walks.

mod compile;
mod types;

pub use compile::{compile_schema, CompiledKind, CompiledNode, CompiledSchema, CompiledValidator};
pub use types::{
    opaque_type_of, opaque_value, SchemaMap, SchemaNode, ValidatorRef, EXTENDED_TYPE_PREFIX,
    OPAQUE_TYPE_KEY,
};
