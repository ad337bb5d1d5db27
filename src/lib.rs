// SPDX-License-Identifier: MIT

//! actionflow-rs: schema-driven action composition
//!
//! Composes a named set of steps (sync or async) into a single callable
//! action. Step results are merged into a shared JSON state tree that is
//! re-validated against a declarative schema after every mutation. The
//! sequencing of steps is delegated to an externally supplied front
//! controller; this crate owns the state-merge and validation engine.

pub mod action;
pub mod error;

pub use action::builder::ActionBuilder;
pub use action::conditions::{ConditionFn, Conditions};
pub use action::controller::FrontController;
pub use action::executor::Action;
pub use action::receiver::{DataSender, ReceiverOpener, ReceiverToken};
pub use action::schema::{opaque_value, SchemaMap, SchemaNode, ValidatorRef};
pub use action::state::StateHandle;
pub use action::step::{BoundStep, BoundSteps, StepDef, StepKind, StepOutput};
pub use action::validate::ValidatorRegistry;
pub use action::{GET_RESULT, SET_INPUT};
pub use error::{BoxError, ConfigError, FlowError, ValidationError, Violation, ViolationKind};
