//! Request/response correlation for the generic RPC passthrough.

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use comet_core::error::{CometError, Result};
use comet_core::protocol::RpcResponse;

/// Pending RPC waiters: correlation id -> oneshot sender.
pub struct RpcCorrelator {
    pending: DashMap<String, oneshot::Sender<Result<Value>>>,
    max_pending: usize,
}

impl RpcCorrelator {
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: DashMap::new(),
            max_pending,
        }
    }

    /// Register a waiter for `id`.
    pub fn register(&self, id: &str) -> Result<oneshot::Receiver<Result<Value>>> {
        let pending_len = self.pending.len();
        if pending_len >= self.max_pending {
            tracing::warn!(
                pending_len,
                max_pending = self.max_pending,
                "too many pending rpc calls; refusing new call"
            );
            return Err(CometError::Internal("too many pending rpc calls".into()));
        }
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id.to_string(), tx);
        tracing::debug!(rpc_id = %id, pending_len = pending_len + 1, "registered rpc waiter");
        Ok(rx)
    }

    /// Settle the waiter whose id matches. Returns false for unknown ids.
    pub fn resolve(&self, resp: RpcResponse) -> bool {
        let Some((id, tx)) = self.pending.remove(&resp.id) else {
            tracing::debug!(rpc_id = %resp.id, "rpc response with no pending call");
            return false;
        };
        let _ = tx.send(resp.into_result());
        tracing::debug!(rpc_id = %id, "rpc call settled");
        true
    }

    pub fn forget(&self, id: &str) {
        self.pending.remove(id);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
