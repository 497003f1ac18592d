//! Decode-once codec for window message events.
//!
//! - `data` is the JSON text of the event's payload
//! - the source window is kept so capability hooks can reply to it directly

use std::fmt;
use std::sync::Arc;

use comet_core::{error::Result, protocol::Inbound};

use super::channel::FrameWindow;

/// A raw window `message` event as seen by the host.
#[derive(Clone)]
pub struct MessageEvent {
    pub origin: String,
    pub data: String,
    pub source: Option<Arc<dyn FrameWindow>>,
}

impl MessageEvent {
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn FrameWindow>) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Debug for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEvent")
            .field("origin", &self.origin)
            .field("data", &self.data)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

/// A decoded envelope plus the window that sent it.
#[derive(Clone)]
pub struct InboundEvent {
    pub message: Inbound,
    pub source: Option<Arc<dyn FrameWindow>>,
}

impl fmt::Debug for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundEvent")
            .field("message", &self.message)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

pub fn decode(event: MessageEvent) -> Result<InboundEvent> {
    let message = Inbound::from_text(&event.data)?;
    Ok(InboundEvent {
        message,
        source: event.source,
    })
}
