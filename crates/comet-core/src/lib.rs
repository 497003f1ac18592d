//! comet core: transport-agnostic wire contracts and error types.
//!
//! This crate defines the envelope shapes exchanged between a host page and
//! the embedded wallet frame, together with the error surface shared by the
//! SDK runtime. It carries no transport or runtime dependencies so it can be
//! reused from a browser binding, a test harness, or a native host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed inbound
//! data surfaces as `CometError::BadEnvelope` or `CometError::Encoding`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

pub use error::{CometError, ErrorCode, Result};
