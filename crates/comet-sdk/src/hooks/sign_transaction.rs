//! Transaction signing with pre-flight enrichment.
//!
//! Before the transaction is forwarded to the frame it gets a fee payer (the
//! signed-in account) and a recency marker (fetched over the RPC passthrough)
//! if it lacks them. Forwarding waits until the account is known AND the
//! frame has asked for the transaction from a known window; each of those
//! events re-checks the condition.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use comet_core::error::{CometError, Result};
use comet_core::protocol::payload::to_hex;
use comet_core::protocol::{Inbound, ModalRequest, ModalRequestKind, Outbound};

use crate::dispatch::{EnvelopeListener, Subscription};
use crate::hooks::capability::CapabilitySlot;
use crate::session::Session;
use crate::transport::{FrameWindow, InboundEvent};

/// Chain transaction as seen by the signing flow. Implemented by host
/// wrappers around their wallet library's transaction type.
pub trait Transaction: Send + Sized + 'static {
    fn fee_payer(&self) -> Option<String>;
    fn set_fee_payer(&mut self, address: &str) -> Result<()>;
    fn recency_marker(&self) -> Option<String>;
    fn set_recency_marker(&mut self, marker: String);
    /// Serialize without requiring or verifying signatures.
    fn serialize_unsigned(&self) -> Result<Vec<u8>>;
    /// Decode the signed transaction returned by the frame.
    fn from_signed_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Supplies a fresh recency marker (e.g. a recent blockhash).
#[async_trait]
pub trait RecencySource: Send + Sync {
    async fn latest(&self, session: &Session) -> Result<String>;
}

/// `getLatestBlockhash` over the session's RPC passthrough.
pub struct RpcBlockhash;

#[async_trait]
impl RecencySource for RpcBlockhash {
    async fn latest(&self, session: &Session) -> Result<String> {
        let resp = session
            .send_rpc_request(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getLatestBlockhash",
                "params": [],
            }))
            .await?;
        resp.pointer("/result/value/blockhash")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| CometError::Rpc(json!({ "message": "missing result.value.blockhash" })))
    }
}

pub struct SignTransactionHook<T: Transaction> {
    shared: Arc<Shared<T>>,
    _subscription: Subscription,
}

struct Shared<T> {
    session: Session,
    transaction: Mutex<T>,
    recency: Arc<dyn RecencySource>,
    slot: Arc<CapabilitySlot<T>>,
    /// Window that asked for the transaction, once it has.
    requested_by: Mutex<Option<Arc<dyn FrameWindow>>>,
    changed: Notify,
}

impl<T: Transaction> SignTransactionHook<T> {
    pub fn new(session: &Session, transaction: T) -> Self {
        Self::with_recency(session, transaction, Arc::new(RpcBlockhash))
    }

    pub fn with_recency(session: &Session, transaction: T, recency: Arc<dyn RecencySource>) -> Self {
        let shared = Arc::new(Shared {
            session: session.clone(),
            transaction: Mutex::new(transaction),
            recency,
            slot: CapabilitySlot::new(),
            requested_by: Mutex::new(None),
            changed: Notify::new(),
        });
        let _subscription = session.subscribe(shared.clone());
        Self {
            shared,
            _subscription,
        }
    }

    /// Current (possibly enriched) transaction.
    pub fn transaction(&self) -> T
    where
        T: Clone,
    {
        self.shared.tx().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.slot.is_pending()
    }

    /// Publishes the request and opens the modal right away. The returned
    /// future enriches and forwards the transaction, then resolves with the
    /// signed one.
    pub fn sign_transaction(&self) -> impl Future<Output = Result<T>> + '_ {
        let s = &self.shared;
        *s.requester() = None;

        let request =
            ModalRequest::capability(ModalRequestKind::SignTransaction, &s.session.config().app_title);
        let mut completion = s.slot.begin(&s.session, request);

        async move {
            tokio::select! {
                res = &mut completion => return res,
                forwarded = s.forward_when_ready() => {
                    if let Err(e) = forwarded {
                        tracing::warn!(error = %e, "transaction enrichment failed");
                        s.slot.finish(&s.session, Err(e));
                    }
                }
            }
            completion.await
        }
    }
}

impl<T: Transaction> Shared<T> {
    fn tx(&self) -> MutexGuard<'_, T> {
        self.transaction.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn requester(&self) -> MutexGuard<'_, Option<Arc<dyn FrameWindow>>> {
        self.requested_by.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ready(&self) -> Option<(String, Arc<dyn FrameWindow>)> {
        let source = self.requester().clone()?;
        let user = self.session.user()?;
        let address = user.address()?.to_string();
        Some((address, source))
    }

    async fn forward_when_ready(&self) -> Result<()> {
        let (address, source) = loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(ready) = self.ready() {
                break ready;
            }
            notified.await;
        };

        let needs_marker = self.tx().recency_marker().is_none();
        if needs_marker {
            let marker = self.recency.latest(&self.session).await?;
            self.tx().set_recency_marker(marker);
        }

        let bytes = {
            let mut tx = self.tx();
            if tx.fee_payer().is_none() {
                tx.set_fee_payer(&address)?;
            }
            tx.serialize_unsigned()?
        };

        self.session.reply_to(
            source.as_ref(),
            &Outbound::StartSignTransaction {
                transaction: to_hex(&bytes),
                title: self.session.config().app_title.clone(),
            },
        );
        Ok(())
    }
}

impl<T: Transaction> EnvelopeListener for Shared<T> {
    fn on_inbound(&self, event: &InboundEvent) {
        match &event.message {
            Inbound::RequestSignTransaction => {
                if !self.slot.is_pending() {
                    return;
                }
                let Some(source) = event.source.clone() else {
                    tracing::warn!("requestSignTransaction without a source window");
                    return;
                };
                *self.requester() = Some(source);
                self.changed.notify_waiters();
            }
            Inbound::SetUser(_) => self.changed.notify_waiters(),
            Inbound::FinishSignTransaction(fin) => {
                *self.requester() = None;
                let outcome = fin
                    .clone()
                    .into_bytes("signing transaction")
                    .and_then(|b| T::from_signed_bytes(&b));
                self.slot.finish(&self.session, outcome);
            }
            _ => {}
        }
    }
}
