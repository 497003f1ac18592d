//! Single-shot completion handle.
//!
//! A `Deferred<T>` is settled at most once; its paired `Completion<T>` is the
//! awaitable side. Dropping an unsettled `Deferred` completes the waiter with
//! `CometError::Cancelled`, so a request can never hang on a handle nobody
//! owns anymore.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use comet_core::error::{CometError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredState {
    Pending,
    Fulfilled,
    Rejected,
}

enum Slot<T> {
    Pending(oneshot::Sender<Result<T>>),
    Settled(DeferredState),
}

pub struct Deferred<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Deferred<T> {
    pub fn new() -> (Self, Completion<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Mutex::new(Slot::Pending(tx)),
            },
            Completion { rx },
        )
    }

    /// Returns false if already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Returns false if already settled.
    pub fn reject(&self, err: CometError) -> bool {
        self.settle(Err(err))
    }

    pub fn state(&self) -> DeferredState {
        match &*self.slot.lock().unwrap_or_else(PoisonError::into_inner) {
            Slot::Pending(_) => DeferredState::Pending,
            Slot::Settled(s) => *s,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == DeferredState::Pending
    }

    fn settle(&self, outcome: Result<T>) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let next = if outcome.is_ok() {
            DeferredState::Fulfilled
        } else {
            DeferredState::Rejected
        };
        match std::mem::replace(&mut *slot, Slot::Settled(next)) {
            Slot::Pending(tx) => {
                // the waiter may be gone; settling still counts
                let _ = tx.send(outcome);
                true
            }
            Slot::Settled(prev) => {
                *slot = Slot::Settled(prev);
                false
            }
        }
    }
}

/// Awaitable side of a `Deferred`.
#[must_use = "a completion does nothing unless awaited"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Future for Completion<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(CometError::Cancelled)))
    }
}
