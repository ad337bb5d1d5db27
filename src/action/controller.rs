// SPDX-License-Identifier: MIT

//! Front controller trait
//!
//! The front controller is the sole sequencer of one invocation: it decides
//! the order (and any concurrency) of bound step calls, consults conditions,
//! and owns any continue-on-error policy. The engine imposes no ordering of
//! its own and performs no retry or suppression on its behalf.

use crate::action::conditions::Conditions;
use crate::action::step::BoundSteps;
use crate::error::FlowError;
use async_trait::async_trait;

#[async_trait]
pub trait FrontController: Send + Sync {
    async fn run(&self, conditions: &Conditions, steps: &BoundSteps) -> Result<(), FlowError>;
}
