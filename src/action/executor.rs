// SPDX-License-Identifier: MIT

//! Action execution
//!
//! One invocation runs the fixed cycle: reset state, merge `setInput`,
//! validate, hand control to the front controller, fold the state into a
//! result, merge it under `getResult`, validate again and return the fold
//! result. Validation errors reject the invocation at the merge that caused
//! them; step and controller errors propagate unchanged.

use crate::action::conditions::Conditions;
use crate::action::controller::FrontController;
use crate::action::receiver::ReceiverToken;
use crate::action::schema::CompiledSchema;
use crate::action::state::{init_state, merge_section, StateHandle};
use crate::action::step::{BoundSteps, StepOutput};
use crate::action::validate::validate_state;
use crate::action::{GET_RESULT, SET_INPUT};
use crate::error::{ConfigError, FlowError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Fold from the full state tree to the action's result value
pub(crate) type FoldFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Change callback: `(result, triggering step name)`
pub(crate) type ResultChangedFn = Arc<dyn Fn(&Value, &str) + Send + Sync>;

/// Shared core of one built action: compiled schema, live state, receiver
/// table and the fold. Bound steps and data senders all point here.
pub(crate) struct ActionInner {
    pub(crate) schema: CompiledSchema,
    pub(crate) state: StateHandle,
    receivers: Mutex<HashMap<ReceiverToken, Option<String>>>,
    pub(crate) fold: FoldFn,
    pub(crate) on_result_changed: Option<ResultChangedFn>,
}

impl ActionInner {
    pub(crate) fn new(
        schema: CompiledSchema,
        state: StateHandle,
        fold: FoldFn,
        on_result_changed: Option<ResultChangedFn>,
    ) -> Self {
        Self {
            schema,
            state,
            receivers: Mutex::new(HashMap::new()),
            fold,
            on_result_changed,
        }
    }

    pub(crate) fn register_receiver(&self, token: ReceiverToken) {
        let mut receivers = self.receivers.lock().expect("receiver table poisoned");
        receivers.insert(token, None);
    }

    /// Reset state to its initial tree, overlaying declared initial sections.
    pub(crate) fn reset_state(&self, initial: &Map<String, Value>) {
        self.state.with(|state| {
            *state = init_state(&self.schema);
            if let Some(root) = state.as_object_mut() {
                for (section, value) in initial {
                    root.insert(section.clone(), value.clone());
                }
            }
        });
    }

    pub(crate) fn merge_and_validate(
        &self,
        section: &str,
        incoming: Option<&Value>,
    ) -> Result<(), FlowError> {
        self.state.with(|state| {
            merge_section(&self.schema, state, section, incoming);
            validate_state(&self.schema, state)
        })?;
        Ok(())
    }

    /// Store a step's output: merge data immediately, or associate a
    /// receiver token with the step name for later out-of-band pushes.
    pub(crate) fn store_step_result(&self, step: &str, output: StepOutput) -> Result<(), FlowError> {
        match output {
            StepOutput::Data(value) => self.merge_and_validate(step, Some(&value)),
            StepOutput::Receiver(token) => {
                let mut receivers = self.receivers.lock().expect("receiver table poisoned");
                let slot = receivers
                    .get_mut(&token)
                    .ok_or(ConfigError::UnknownReceiver)?;
                *slot = Some(step.to_string());
                log::debug!("associated data receiver {:?} with step '{}'", token, step);
                Ok(())
            }
        }
    }

    /// Out-of-band push: merge under the owning step, refold, validate,
    /// notify.
    pub(crate) fn push_received_data(
        &self,
        token: ReceiverToken,
        data: Value,
    ) -> Result<(), FlowError> {
        let step = {
            let receivers = self.receivers.lock().expect("receiver table poisoned");
            receivers
                .get(&token)
                .ok_or(ConfigError::UnknownReceiver)?
                .clone()
                .ok_or(ConfigError::UnboundReceiver)?
        };

        log::debug!("live push from step '{}'", step);
        self.state
            .with(|state| merge_section(&self.schema, state, &step, Some(&data)));

        let result = self.fold_into_result()?;
        if let Some(notify) = &self.on_result_changed {
            notify(&result, &step);
        }
        Ok(())
    }

    /// Fold the state into the action result, merge it under `getResult`
    /// and validate.
    pub(crate) fn fold_into_result(&self) -> Result<Value, FlowError> {
        let snapshot = self.state.snapshot();
        let result = (self.fold)(&snapshot);
        self.merge_and_validate(GET_RESULT, Some(&result))?;
        Ok(result)
    }
}

/// A built action: invoke it any number of times; each invocation starts
/// from a freshly initialized state. At most one invocation may be in
/// flight at a time.
pub struct Action {
    inner: Arc<ActionInner>,
    controller: Arc<dyn FrontController>,
    conditions: Conditions,
    steps: BoundSteps,
    initial_state: Map<String, Value>,
}

impl Action {
    pub(crate) fn new(
        inner: Arc<ActionInner>,
        controller: Arc<dyn FrontController>,
        conditions: Conditions,
        steps: BoundSteps,
        initial_state: Map<String, Value>,
    ) -> Self {
        Self {
            inner,
            controller,
            conditions,
            steps,
            initial_state,
        }
    }

    /// Run the action with the given input props.
    pub async fn call(&self, props: Value) -> Result<Value, FlowError> {
        self.inner.reset_state(&self.initial_state);
        self.inner.merge_and_validate(SET_INPUT, Some(&props))?;

        self.controller.run(&self.conditions, &self.steps).await?;

        self.inner.fold_into_result()
    }

    /// Handle onto the live state, for inspection between invocations.
    pub fn state(&self) -> StateHandle {
        self.inner.state.clone()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("steps", &self.steps.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
