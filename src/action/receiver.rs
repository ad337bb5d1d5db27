// SPDX-License-Identifier: MIT

//! Data receivers: out-of-band result delivery
//!
//! A step that produces results over time, instead of through its return
//! value, opens a data receiver: it hands `ReceiverOpener::open` a
//! registration callback which captures a `DataSender`, and returns the
//! resulting token as its step output. Storing that output associates the
//! token with the step's name; from then on every `DataSender::send` merges
//! its payload under that name, recomputes the fold and notifies the change
//! callback. Senders stay usable for the lifetime of the built action,
//! including after the main invocation has resolved.

use crate::action::executor::ActionInner;
use crate::error::FlowError;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque handle identifying one opened data receiver. Compared by handle
/// identity, never by the data flowing through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverToken(Uuid);

impl ReceiverToken {
    pub(crate) fn issue() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Handed to the steps provider; lets a step opt into out-of-band delivery.
#[derive(Clone)]
pub struct ReceiverOpener {
    inner: Arc<ActionInner>,
}

impl ReceiverOpener {
    pub(crate) fn new(inner: Arc<ActionInner>) -> Self {
        Self { inner }
    }

    /// Open a receiver: the registration callback receives the sender, the
    /// step returns the token as its output.
    pub fn open(&self, register: impl FnOnce(DataSender)) -> crate::action::step::StepOutput {
        let token = ReceiverToken::issue();
        self.inner.register_receiver(token);

        register(DataSender {
            token,
            inner: self.inner.clone(),
        });

        log::debug!("opened data receiver {:?}", token);
        crate::action::step::StepOutput::Receiver(token)
    }
}

/// Pushes out-of-band payloads into the action's state
#[derive(Clone)]
pub struct DataSender {
    token: ReceiverToken,
    inner: Arc<ActionInner>,
}

impl DataSender {
    /// Merge a payload under the associated step's section, recompute the
    /// fold, validate and notify the change callback.
    ///
    /// Fails with `ConfigError::UnboundReceiver` when the owning step has not
    /// stored the token yet, and with `ValidationError` when the resulting
    /// state does not satisfy the schema.
    pub fn send(&self, data: Value) -> Result<(), FlowError> {
        self.inner.push_received_data(self.token, data)
    }
}
