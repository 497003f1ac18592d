//! Outbound channel to the embedded wallet frame.
//!
//! Sends are best effort: with no frame mounted the envelope is dropped and
//! logged, never reported as an error.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use comet_core::protocol::Outbound;

/// A window the host can post to: the frame's content window, or the window
/// that originated a capability request.
pub trait FrameWindow: Send + Sync {
    fn post_message(&self, message: &Value, target_origin: &str);
}

/// Owns the handle to the mounted frame and the origin it is addressed to.
pub struct MessageChannel {
    frame: RwLock<Option<Arc<dyn FrameWindow>>>,
    target_origin: String,
}

impl MessageChannel {
    pub fn new(target_origin: impl Into<String>) -> Self {
        Self {
            frame: RwLock::new(None),
            target_origin: target_origin.into(),
        }
    }

    pub fn target_origin(&self) -> &str {
        &self.target_origin
    }

    /// Install the frame. Returns the previously mounted frame, if any.
    pub fn mount(&self, frame: Arc<dyn FrameWindow>) -> Option<Arc<dyn FrameWindow>> {
        self.frame
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(frame)
    }

    pub fn unmount(&self) -> Option<Arc<dyn FrameWindow>> {
        self.frame
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_mounted(&self) -> bool {
        self.frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Post an envelope to the mounted frame. Returns whether it was posted.
    pub fn send(&self, msg: &Outbound) -> bool {
        let frame = self
            .frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(frame) = frame else {
            tracing::debug!(msg_type = msg.short_type(), "no frame mounted; dropping envelope");
            return false;
        };
        self.post(frame.as_ref(), msg)
    }

    /// Post an envelope straight to another window (e.g. a request's source).
    pub fn reply(&self, window: &dyn FrameWindow, msg: &Outbound) -> bool {
        self.post(window, msg)
    }

    fn post(&self, window: &dyn FrameWindow, msg: &Outbound) -> bool {
        match msg.to_value() {
            Ok(v) => {
                tracing::trace!(msg_type = msg.short_type(), origin = %self.target_origin, "post");
                window.post_message(&v, &self.target_origin);
                true
            }
            Err(e) => {
                tracing::warn!(msg_type = msg.short_type(), error = %e, "envelope encode failed");
                false
            }
        }
    }
}
