//! Request hooks: typed entry points host apps call against a `Session`.
//!
//! Capability hooks (sign message, sign transaction, shared secret) each
//! subscribe a listener for their request/finish envelopes and hold at most
//! one in-flight request. Account, modal, and mint hooks are thin views over
//! session state.

mod account;
mod capability;
mod mint;
mod modal;
mod shared_secret;
mod sign_message;
mod sign_transaction;

pub use account::{account, watch_account};
pub use mint::MintHook;
pub use modal::{modal, ModalHandle};
pub use shared_secret::SharedSecretHook;
pub use sign_message::SignMessageHook;
pub use sign_transaction::{RecencySource, RpcBlockhash, SignTransactionHook, Transaction};
