// SPDX-License-Identifier: MIT

//! Full-tree state validation
//!
//! `registry` holds named custom validator handlers; `check` walks a state
//! snapshot against the compiled schema and reports every violation at once.

mod check;
mod registry;

pub use check::validate_state;
pub use registry::{ValidatorHandler, ValidatorRegistry};
