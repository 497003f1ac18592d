//! Top-level facade crate for comet.
//!
//! Re-exports core types and the sdk runtime so hosts can depend on a single crate.

pub mod core {
    pub use comet_core::*;
}

pub mod sdk {
    pub use comet_sdk::*;
}

pub use comet_core::{CometError, ErrorCode, Result};
pub use comet_sdk::hooks::{
    account, modal, watch_account, MintHook, SharedSecretHook, SignMessageHook, SignTransactionHook,
};
pub use comet_sdk::{FrameWindow, MessageEvent, ProviderConfig, Session};
