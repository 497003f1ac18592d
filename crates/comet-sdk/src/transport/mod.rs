//! Transport layer (window messaging).
//!
//! Exposes the injected frame handle, the outbound message channel, the
//! inbound origin policy, and the codec that decodes window messages once
//! before they reach the session and listeners.

pub mod channel;
pub mod codec;
pub mod origin;

pub use channel::{FrameWindow, MessageChannel};
pub use codec::{decode, InboundEvent, MessageEvent};
pub use origin::{OriginPolicy, PolicyDecision};
