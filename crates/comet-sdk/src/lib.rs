//! comet sdk: host-side runtime for the embedded wallet frame.
//!
//! A `Session` owns the frame handle, readiness handshake, modal state, and
//! RPC correlation. Hooks (`SignMessageHook`, `SignTransactionHook`,
//! `SharedSecretHook`, `MintHook`, and the account/modal helpers) are built
//! against a session and expose the privileged operations as futures.
//!
//! The host feeds every window `message` event into
//! `Session::handle_message` and supplies the frame as a `FrameWindow`.

pub mod config;
pub mod deferred;
pub mod dispatch;
pub mod hooks;
pub mod session;
pub mod transport;

pub use config::ProviderConfig;
pub use deferred::{Completion, Deferred, DeferredState};
pub use session::Session;
pub use transport::{FrameWindow, MessageEvent};
