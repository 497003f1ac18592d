//! Shared error type across comet crates.

use thiserror::Error;

/// Stable error codes surfaced to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Provider or button configuration is invalid.
    InvalidConfig,
    /// The user declined the request inside the wallet frame.
    UserRejected,
    /// The request was cancelled by closing the modal.
    Cancelled,
    /// The request was replaced by a newer one.
    Superseded,
    /// The frame answered an RPC call with an error.
    Rpc,
    /// Inbound envelope did not match its expected shape.
    BadEnvelope,
    /// Payload encoding or decoding failed.
    Encoding,
    /// No answer arrived in time.
    Timeout,
    /// Session or channel is gone.
    Closed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and host bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UserRejected => "USER_REJECTED",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::Superseded => "SUPERSEDED",
            ErrorCode::Rpc => "RPC",
            ErrorCode::BadEnvelope => "BAD_ENVELOPE",
            ErrorCode::Encoding => "ENCODING",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Closed => "CLOSED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CometError>;

/// Unified error type used by core and sdk.
#[derive(Debug, Clone, Error)]
pub enum CometError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid config: publishable_key is required")]
    MissingPublishableKey,
    #[error("user rejected {0}")]
    UserRejected(&'static str),
    #[error("request cancelled")]
    Cancelled,
    #[error("request superseded by a newer request")]
    Superseded,
    #[error("rpc error: {0}")]
    Rpc(serde_json::Value),
    #[error("bad envelope: {0}")]
    BadEnvelope(String),
    #[error("encoding: {0}")]
    Encoding(String),
    #[error("timed out")]
    Timeout,
    #[error("closed: {0}")]
    Closed(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CometError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CometError::InvalidConfig(_) | CometError::MissingPublishableKey => {
                ErrorCode::InvalidConfig
            }
            CometError::UserRejected(_) => ErrorCode::UserRejected,
            CometError::Cancelled => ErrorCode::Cancelled,
            CometError::Superseded => ErrorCode::Superseded,
            CometError::Rpc(_) => ErrorCode::Rpc,
            CometError::BadEnvelope(_) => ErrorCode::BadEnvelope,
            CometError::Encoding(_) => ErrorCode::Encoding,
            CometError::Timeout => ErrorCode::Timeout,
            CometError::Closed(_) => ErrorCode::Closed,
            CometError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors raised synchronously while building a session.
    pub fn is_config(&self) -> bool {
        self.code() == ErrorCode::InvalidConfig
    }
}
