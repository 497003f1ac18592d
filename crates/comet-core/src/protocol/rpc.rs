//! Generic RPC passthrough payloads.
//!
//! The host never interprets `request`/`response`; it only correlates them by
//! `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CometError, Result};

/// Outbound `rpcRequest` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: String,
    pub request: Value,
}

/// Inbound `rpcResponse` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: String,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    /// `error` present wins over `response`; a missing response is `null`.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(CometError::Rpc(err)),
            None => Ok(self.response.unwrap_or(Value::Null)),
        }
    }
}
