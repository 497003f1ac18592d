//! The one-request-at-a-time modal slot.
//!
//! Acquiring while held preempts the holder: its cancel callback runs with
//! `CometError::Superseded`. Closing the modal runs it with
//! `CometError::Cancelled`. Releasing by ticket never runs it.
//!
//! Callbacks are handed back to the caller instead of being run here, so they
//! execute after the session lock is released.

use std::fmt;

use comet_core::error::CometError;
use comet_core::protocol::ModalRequest;

/// Identifies one acquisition of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalTicket(u64);

impl fmt::Display for ModalTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type CancelFn = Box<dyn FnOnce(ModalTicket, CometError) + Send>;

struct Holder {
    ticket: ModalTicket,
    request: ModalRequest,
    on_cancel: Option<CancelFn>,
}

/// A cancellation that must be run once the caller drops its locks.
pub struct Evicted {
    ticket: ModalTicket,
    on_cancel: CancelFn,
}

impl Evicted {
    pub fn run(self, err: CometError) {
        tracing::debug!(ticket = %self.ticket, reason = %err, "modal request evicted");
        (self.on_cancel)(self.ticket, err);
    }
}

#[derive(Default)]
pub struct ModalSlot {
    next: u64,
    held: Option<Holder>,
}

impl ModalSlot {
    pub fn current(&self) -> Option<&ModalRequest> {
        self.held.as_ref().map(|h| &h.request)
    }

    pub fn ticket(&self) -> Option<ModalTicket> {
        self.held.as_ref().map(|h| h.ticket)
    }

    /// Take the slot for `request`. The previous holder, if any, is returned
    /// for eviction.
    pub fn acquire(
        &mut self,
        request: ModalRequest,
        on_cancel: Option<CancelFn>,
    ) -> (ModalTicket, Option<Evicted>) {
        self.next += 1;
        let ticket = ModalTicket(self.next);
        let prev = self.held.replace(Holder {
            ticket,
            request,
            on_cancel,
        });
        (ticket, prev.and_then(into_evicted))
    }

    /// Clear if `ticket` still holds the slot.
    pub fn release(&mut self, ticket: ModalTicket) -> bool {
        if self.ticket() == Some(ticket) {
            self.held = None;
            true
        } else {
            false
        }
    }

    /// Clear unconditionally, returning the holder for eviction.
    pub fn clear(&mut self) -> Option<Evicted> {
        self.held.take().and_then(into_evicted)
    }
}

fn into_evicted(h: Holder) -> Option<Evicted> {
    h.on_cancel.map(|on_cancel| Evicted {
        ticket: h.ticket,
        on_cancel,
    })
}
