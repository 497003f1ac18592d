//! Session context: the single owner of frame readiness, modal visibility,
//! the pending modal request, the authenticated user, and RPC correlation.

mod context;
mod rpc;
mod slot;

pub use context::Session;
pub use rpc::RpcCorrelator;
pub use slot::{CancelFn, Evicted, ModalSlot, ModalTicket};
