// SPDX-License-Identifier: MIT

//! Typed error handling for actionflow-rs
//!
//! Configuration errors are fatal and surface synchronously while an action
//! is being built; validation errors surface at the merge that produced the
//! offending state. Step errors propagate unchanged apart from being tagged
//! with the step name.

use thiserror::Error;

/// Boxed error type used at the collaborator boundary (step bodies, custom
/// validator handlers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for actionflow-rs
#[derive(Debug, Error)]
pub enum FlowError {
    /// Malformed wiring detected while building an action
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A state snapshot failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A step body returned an error; never retried or suppressed
    #[error("step '{name}' failed: {source}")]
    Step {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Generic error wrapper for front controllers and other collaborators
    #[error("{0}")]
    Other(String),
}

/// Build-time configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Objects must default through their children, never wholesale
    #[error("property '{path}' of type 'object' must not have a default value, set defaults on its properties instead")]
    DefaultOnObject { path: String },

    /// Required and defaulted at the same time is ambiguous
    #[error("property '{name}' cannot be required and have a default value at the same time")]
    RequiredWithDefault { name: String },

    /// `setInput` / `getResult` are reserved section names
    #[error("step name '{name}' is reserved for a built-in state section")]
    ReservedStepName { name: String },

    /// Every declared step needs a schema section of the same name
    #[error("missing schema for step '{name}'")]
    MissingStepSchema { name: String },

    /// Schema referenced a custom validator that was never registered
    #[error("unknown custom validator '{name}'")]
    UnknownValidator { name: String },

    /// Front controller asked for a step that was never provided
    #[error("unknown step '{name}'")]
    UnknownStep { name: String },

    /// Front controller asked for a condition that was never provided
    #[error("unknown condition '{name}'")]
    UnknownCondition { name: String },

    /// A data sender was used before its step returned the receiver token
    #[error("data receiver is not associated with any step yet")]
    UnboundReceiver,

    /// A step returned a receiver token this action never issued
    #[error("unknown data receiver token")]
    UnknownReceiver,

    /// `initial_state` must be a JSON object keyed by section name
    #[error("initial state must be an object mapping section names to values")]
    InvalidInitialState,

    /// A required collaborator was not supplied to the builder
    #[error("missing required collaborator '{name}'")]
    MissingCollaborator { name: &'static str },
}

/// A state snapshot violated the schema; carries every violation found, not
/// just the first.
#[derive(Debug, Error)]
#[error("unsatisfied validation: {} violation(s): {}", .violations.len(), summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One schema violation at one path of the state tree
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dot path into the state tree (e.g. `setInput.address.postcode`)
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
    /// Error raised by a custom validator handler, when there was one
    pub cause: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Type,
    Required,
    ExtendedType,
    Custom,
}

impl From<&str> for FlowError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for FlowError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
