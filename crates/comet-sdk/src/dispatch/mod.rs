//! Listener registry exports.
//!
//! Re-exports the registry and listener trait so hooks can depend on this
//! module directly.

pub mod listeners;

pub use listeners::{EnvelopeListener, ListenerRegistry, Subscription};
