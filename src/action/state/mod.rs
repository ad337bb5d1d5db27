// SPDX-License-Identifier: MIT

//! Shared state tree
//!
//! This module provides:
//! - `init` - builds the initial state tree from the compiled schema
//! - `merge` - folds one section's incoming value into the tree
//! - `store` - the live handle steps and conditions read through

mod init;
mod merge;
mod store;

pub use init::init_state;
pub use merge::merge_section;
pub use store::StateHandle;

pub(crate) use init::{is_truthy, zero_value};
