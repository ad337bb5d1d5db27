// SPDX-License-Identifier: MIT

//! Action builder
//!
//! Assembles the collaborators into a callable `Action`: compiles the
//! data-flow schema, initializes state, evaluates the condition and step
//! providers once against the live state handle, and binds every step to the
//! result store. All wiring mistakes surface here, synchronously, as
//! `ConfigError`s rather than at invocation time.

use crate::action::conditions::{ConditionFn, Conditions};
use crate::action::controller::FrontController;
use crate::action::executor::{Action, ActionInner, FoldFn, ResultChangedFn};
use crate::action::receiver::ReceiverOpener;
use crate::action::schema::{compile_schema, SchemaMap};
use crate::action::state::{init_state, StateHandle};
use crate::action::step::{BoundStep, BoundSteps, StepDef};
use crate::action::validate::ValidatorRegistry;
use crate::action::{GET_RESULT, SET_INPUT};
use crate::error::{ConfigError, FlowError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

type StepsProvider = Box<dyn FnOnce(StateHandle, ReceiverOpener) -> HashMap<String, StepDef>>;
type ConditionsProvider = Box<dyn FnOnce(StateHandle) -> HashMap<String, ConditionFn>>;

pub struct ActionBuilder {
    schema: SchemaMap,
    validators: ValidatorRegistry,
    fold: Option<FoldFn>,
    controller: Option<Arc<dyn FrontController>>,
    steps_provider: Option<StepsProvider>,
    conditions_provider: Option<ConditionsProvider>,
    initial_state: Value,
    on_result_changed: Option<ResultChangedFn>,
}

impl ActionBuilder {
    pub fn new(schema: SchemaMap) -> Self {
        Self {
            schema,
            validators: ValidatorRegistry::new(),
            fold: None,
            controller: None,
            steps_provider: None,
            conditions_provider: None,
            initial_state: Value::Object(Map::new()),
            on_result_changed: None,
        }
    }

    /// Registry the schema's custom validator references resolve against.
    pub fn validators(mut self, registry: ValidatorRegistry) -> Self {
        self.validators = registry;
        self
    }

    /// Pure reduction from the state tree to the action's result value.
    pub fn fold_step_results<F>(mut self, fold: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.fold = Some(Arc::new(fold));
        self
    }

    pub fn front_controller<C>(mut self, controller: C) -> Self
    where
        C: FrontController + 'static,
    {
        self.controller = Some(Arc::new(controller));
        self
    }

    /// Step provider, run once at build time against the live state handle.
    pub fn steps<P>(mut self, provider: P) -> Self
    where
        P: FnOnce(StateHandle, ReceiverOpener) -> HashMap<String, StepDef> + 'static,
    {
        self.steps_provider = Some(Box::new(provider));
        self
    }

    /// Condition provider, run once at build time against the live state
    /// handle. Optional; absent means no conditions.
    pub fn conditions<P>(mut self, provider: P) -> Self
    where
        P: FnOnce(StateHandle) -> HashMap<String, ConditionFn> + 'static,
    {
        self.conditions_provider = Some(Box::new(provider));
        self
    }

    /// Sections overlaid onto the freshly initialized state at the start of
    /// every invocation. Must be a JSON object keyed by section name.
    pub fn initial_state(mut self, state: Value) -> Self {
        self.initial_state = state;
        self
    }

    /// Callback notified on every out-of-band data push.
    pub fn on_result_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value, &str) + Send + Sync + 'static,
    {
        self.on_result_changed = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Result<Action, FlowError> {
        let fold = self
            .fold
            .ok_or(ConfigError::MissingCollaborator { name: "fold_step_results" })?;
        let controller = self
            .controller
            .ok_or(ConfigError::MissingCollaborator { name: "front_controller" })?;
        let steps_provider = self
            .steps_provider
            .ok_or(ConfigError::MissingCollaborator { name: "steps" })?;

        let Value::Object(initial_state) = self.initial_state else {
            return Err(ConfigError::InvalidInitialState.into());
        };

        let compiled = compile_schema(&self.schema, &self.validators)?;
        let state = StateHandle::new(init_state(&compiled));

        let inner = Arc::new(ActionInner::new(
            compiled,
            state.clone(),
            fold,
            self.on_result_changed,
        ));

        let step_defs = steps_provider(state.clone(), ReceiverOpener::new(inner.clone()));
        let mut bound = HashMap::new();
        for (name, def) in step_defs {
            if name == SET_INPUT || name == GET_RESULT {
                return Err(ConfigError::ReservedStepName { name }.into());
            }
            if !self.schema.contains_key(&name) {
                return Err(ConfigError::MissingStepSchema { name }.into());
            }
            bound.insert(name.clone(), BoundStep::new(name, def, inner.clone()));
        }

        let conditions = match self.conditions_provider {
            Some(provider) => Conditions::new(provider(state)),
            None => Conditions::default(),
        };

        log::debug!("built action with {} bound step(s)", bound.len());

        Ok(Action::new(
            inner,
            controller,
            conditions,
            BoundSteps::new(bound),
            initial_state,
        ))
    }
}
