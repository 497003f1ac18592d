//! In-flight bookkeeping shared by the capability hooks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use comet_core::error::{CometError, Result};
use comet_core::protocol::ModalRequest;

use crate::deferred::{Completion, Deferred};
use crate::session::{ModalTicket, Session};

struct InFlight<T> {
    ticket: ModalTicket,
    deferred: Deferred<T>,
}

/// One hook's pending request, tied to the ticket that holds the modal.
pub(crate) struct CapabilitySlot<T> {
    inflight: Mutex<Option<InFlight<T>>>,
}

impl<T: Send + 'static> CapabilitySlot<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inflight: Mutex::new(None),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<InFlight<T>>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    /// Publish `request`, open the modal, and hand back the completion.
    ///
    /// A request still in flight on this hook is rejected as superseded.
    pub(crate) fn begin(self: &Arc<Self>, session: &Session, request: ModalRequest) -> Completion<T> {
        let (deferred, completion) = Deferred::new();

        let weak = Arc::downgrade(self);
        let ticket = session.acquire_modal(
            request,
            Box::new(move |ticket, err| {
                if let Some(slot) = weak.upgrade() {
                    slot.cancel(ticket, err);
                }
            }),
        );

        let prev = self.lock().replace(InFlight { ticket, deferred });
        if let Some(prev) = prev {
            prev.deferred.reject(CometError::Superseded);
        }

        session.open_modal();
        completion
    }

    fn cancel(&self, ticket: ModalTicket, err: CometError) {
        let taken = {
            let mut inflight = self.lock();
            match inflight.as_ref() {
                Some(f) if f.ticket == ticket => inflight.take(),
                _ => None,
            }
        };
        if let Some(f) = taken {
            f.deferred.reject(err);
        }
    }

    /// Settle the in-flight request, then close the modal and clear it.
    /// Returns false when nothing was in flight.
    pub(crate) fn finish(&self, session: &Session, outcome: Result<T>) -> bool {
        let Some(f) = self.lock().take() else {
            tracing::debug!("finish envelope with no request in flight; ignoring");
            return false;
        };
        match outcome {
            Ok(v) => f.deferred.resolve(v),
            Err(e) => f.deferred.reject(e),
        };
        session.complete_modal(f.ticket);
        true
    }
}
