//! Pending calls and the handles callers await.

use crate::types::CallDescriptor;
use crate::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::trace;

/// Lifecycle of one logical call. `Pending` moves to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Pending,
    Succeeded,
    Failed,
}

/// Single-use completion slot of a call.
///
/// Dropping a slot that was never completed fails the caller with
/// [`Error::QueueClosed`].
#[derive(Debug)]
pub struct Completion {
    tx: Option<oneshot::Sender<Result<Value>>>,
    state: CallState,
}

impl Completion {
    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn succeed(&mut self, value: Value) -> bool {
        self.complete(Ok(value))
    }

    pub fn fail(&mut self, error: Error) -> bool {
        self.complete(Err(error))
    }

    /// Returns false if the slot was already completed; the result is discarded.
    pub fn complete(&mut self, result: Result<Value>) -> bool {
        let Some(tx) = self.tx.take() else {
            return false;
        };
        self.state = if result.is_ok() {
            CallState::Succeeded
        } else {
            CallState::Failed
        };
        if tx.send(result).is_err() {
            trace!("caller dropped its handle before the batch completed");
        }
        true
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(Error::QueueClosed));
        }
    }
}

/// One caller's request, not yet sent.
#[derive(Debug)]
pub struct PendingCall {
    pub descriptor: CallDescriptor,
    pub completion: Completion,
}

impl PendingCall {
    pub fn new(descriptor: CallDescriptor) -> (Self, CallHandle) {
        let (tx, rx) = oneshot::channel();
        let call = Self {
            descriptor,
            completion: Completion {
                tx: Some(tx),
                state: CallState::Pending,
            },
        };
        (call, CallHandle { rx })
    }

    pub fn into_parts(self) -> (CallDescriptor, Completion) {
        (self.descriptor, self.completion)
    }
}

/// Eventual result of one enqueued call.
///
/// Resolves once, to the item's data or to an [`Error`]: the item's own error,
/// the batch's transport error, or [`Error::QueueClosed`].
#[derive(Debug)]
#[must_use = "the call is sent regardless; dropping the handle discards its result"]
pub struct CallHandle {
    rx: oneshot::Receiver<Result<Value>>,
}

impl CallHandle {
    /// A handle that is already resolved to `error`.
    pub fn rejected(error: Error) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(error));
        Self { rx }
    }
}

impl Future for CallHandle {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(Error::QueueClosed)))
    }
}
