//! Protocol modules.
//!
//! - `envelope`: the `{type, value}` frame and the inbound/outbound tagged unions.
//! - `modal`, `rpc`, `session`, `mint`: typed payloads carried by envelopes.
//! - `payload`: transport-safe encodings for byte payloads (hex, base58).
//!
//! Decoding never panics: unknown envelope types fall through to
//! `Inbound::Unknown`, and known types with bad payloads become
//! `CometError::BadEnvelope`.

pub mod envelope;
pub mod mint;
pub mod modal;
pub mod payload;
pub mod rpc;
pub mod session;

pub use envelope::{Finish, Inbound, Outbound, RawEnvelope, TYPE_PREFIX};
pub use modal::{ModalConfig, ModalRequest, ModalRequestKind};
pub use rpc::{RpcRequest, RpcResponse};
pub use session::{Address, ButtonAction, ChainType, SessionHello, User};
