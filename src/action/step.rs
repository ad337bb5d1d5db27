// SPDX-License-Identifier: MIT

//! Step descriptors and bound step wrappers
//!
//! A `StepDef` carries an explicit sync/async tag and the step body; the
//! builder binds each definition to a result-storing wrapper (`BoundStep`)
//! that merges the step's output into state and re-validates immediately.
//! The front controller sequences `BoundStep` calls through `BoundSteps`.

use crate::action::executor::ActionInner;
use crate::action::receiver::ReceiverToken;
use crate::error::{BoxError, ConfigError, FlowError};
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// What a step body produced: a direct result value, or a receiver token
/// signalling that results will arrive out of band.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    Data(Value),
    Receiver(ReceiverToken),
}

impl From<Value> for StepOutput {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

/// Declared nature of a step body. Explicit by construction; the engine
/// never introspects the callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Sync,
    Async,
}

type SyncBody = Arc<dyn Fn(Value) -> Result<StepOutput, BoxError> + Send + Sync>;
type AsyncBody = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<StepOutput, BoxError>> + Send + Sync>;

#[derive(Clone)]
enum StepBody {
    Sync(SyncBody),
    Async(AsyncBody),
}

/// A step as supplied by the steps provider
#[derive(Clone)]
pub struct StepDef {
    kind: StepKind,
    body: StepBody,
}

impl StepDef {
    pub fn sync<F>(body: F) -> Self
    where
        F: Fn(Value) -> Result<StepOutput, BoxError> + Send + Sync + 'static,
    {
        Self {
            kind: StepKind::Sync,
            body: StepBody::Sync(Arc::new(body)),
        }
    }

    pub fn async_fn<F, Fut>(body: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<StepOutput, BoxError>> + Send + 'static,
    {
        Self {
            kind: StepKind::Async,
            body: StepBody::Async(Arc::new(move |props| Box::pin(body(props)))),
        }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }
}

/// A step bound to the action's result store
#[derive(Clone)]
pub struct BoundStep {
    name: String,
    kind: StepKind,
    body: StepBody,
    inner: Arc<ActionInner>,
}

impl BoundStep {
    pub(crate) fn new(name: String, def: StepDef, inner: Arc<ActionInner>) -> Self {
        Self {
            name,
            kind: def.kind,
            body: def.body,
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Invoke the step without call props.
    pub async fn call(&self) -> Result<(), FlowError> {
        self.call_with(Value::Null).await
    }

    /// Invoke the step, merge its output into state and re-validate.
    /// Re-invocation is legal and overwrites the step's prior state.
    pub async fn call_with(&self, props: Value) -> Result<(), FlowError> {
        log::debug!("executing step '{}'", self.name);

        let output = match &self.body {
            StepBody::Sync(body) => body(props),
            StepBody::Async(body) => body(props).await,
        }
        .map_err(|source| FlowError::Step {
            name: self.name.clone(),
            source,
        })?;

        self.inner.store_step_result(&self.name, output)
    }
}

/// The bound steps of one built action, keyed by step name
#[derive(Clone, Default)]
pub struct BoundSteps {
    steps: HashMap<String, BoundStep>,
}

impl BoundSteps {
    pub(crate) fn new(steps: HashMap<String, BoundStep>) -> Self {
        Self { steps }
    }

    pub fn get(&self, name: &str) -> Option<&BoundStep> {
        self.steps.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Invoke a step by name without props.
    pub async fn run(&self, name: &str) -> Result<(), FlowError> {
        self.run_with(name, Value::Null).await
    }

    /// Invoke a step by name with call props.
    pub async fn run_with(&self, name: &str, props: Value) -> Result<(), FlowError> {
        let step = self.steps.get(name).ok_or(ConfigError::UnknownStep {
            name: name.to_string(),
        })?;
        step.call_with(props).await
    }
}
