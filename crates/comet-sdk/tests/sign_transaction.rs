#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::poll;
use serde_json::{json, Value};

use comet_core::error::{CometError, Result};
use comet_core::protocol::payload::{from_hex, to_hex};
use comet_core::protocol::ModalRequestKind;
use comet_sdk::hooks::{RecencySource, SignTransactionHook, Transaction};
use comet_sdk::Session;

use common::{inbound, inbound_from, RecordingFrame};

/// JSON-encoded stand-in for a chain transaction.
#[derive(Debug, Clone, PartialEq)]
struct FakeTx {
    fee_payer: Option<String>,
    blockhash: Option<String>,
    memo: String,
    signature: Option<String>,
}

impl FakeTx {
    fn memo(memo: &str) -> Self {
        Self {
            fee_payer: None,
            blockhash: None,
            memo: memo.into(),
            signature: None,
        }
    }
}

impl Transaction for FakeTx {
    fn fee_payer(&self) -> Option<String> {
        self.fee_payer.clone()
    }

    fn set_fee_payer(&mut self, address: &str) -> Result<()> {
        if address.is_empty() {
            return Err(CometError::Encoding("empty fee payer".into()));
        }
        self.fee_payer = Some(address.into());
        Ok(())
    }

    fn recency_marker(&self) -> Option<String> {
        self.blockhash.clone()
    }

    fn set_recency_marker(&mut self, marker: String) {
        self.blockhash = Some(marker);
    }

    fn serialize_unsigned(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&json!({
            "feePayer": self.fee_payer,
            "blockhash": self.blockhash,
            "memo": self.memo,
        }))
        .map_err(|e| CometError::Encoding(e.to_string()))
    }

    fn from_signed_bytes(bytes: &[u8]) -> Result<Self> {
        let v: Value =
            serde_json::from_slice(bytes).map_err(|e| CometError::Encoding(e.to_string()))?;
        let text = |k: &str| v[k].as_str().map(str::to_string);
        Ok(Self {
            fee_payer: text("feePayer"),
            blockhash: text("blockhash"),
            memo: text("memo").unwrap_or_default(),
            signature: text("signature"),
        })
    }
}

struct FixedBlockhash(&'static str);

#[async_trait]
impl RecencySource for FixedBlockhash {
    async fn latest(&self, _session: &Session) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn forwarded(popup: &RecordingFrame) -> Value {
    let start = popup.last_of("startSignTransaction").unwrap();
    let bytes = from_hex(start["value"]["transaction"].as_str().unwrap()).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn signed(tx: Value) -> String {
    let mut tx = tx;
    tx["signature"] = json!("sig111");
    to_hex(&serde_json::to_vec(&tx).unwrap())
}

#[tokio::test]
async fn request_is_published_when_called() {
    let (session, frame) = common::loaded_session();
    let hook = SignTransactionHook::new(&session, FakeTx::memo("gm"));
    let signing = hook.sign_transaction();

    assert!(hook.is_pending());
    assert!(session.is_modal_open());
    let req = session.modal_request().unwrap();
    assert_eq!(req.kind, ModalRequestKind::SignTransaction);
    assert!(!req.closeable);
    assert_eq!(frame.types(), vec!["modalRequest", "modalOpen"]);

    session.handle_message(inbound("finishSignTransaction", json!({"success": false})));
    assert_eq!(signing.await.unwrap_err().code().as_str(), "USER_REJECTED");
}

#[tokio::test]
async fn enriches_then_forwards_once_user_and_request_are_known() {
    let (session, frame) = common::loaded_session();
    let hook = SignTransactionHook::new(&session, FakeTx::memo("gm"));
    let mut signing = Box::pin(hook.sign_transaction());

    assert!(poll!(signing.as_mut()).is_pending());
    assert_eq!(
        session.modal_request().unwrap().kind,
        ModalRequestKind::SignTransaction
    );

    let popup = RecordingFrame::new();
    session.handle_message(inbound_from("requestSignTransaction", Value::Null, popup.clone()));
    assert!(poll!(signing.as_mut()).is_pending());
    assert!(popup.posted().is_empty());
    assert!(frame.of_type("rpcRequest").is_empty());

    session.handle_message(inbound("setUser", common::user("u1", "Payer111")));
    assert!(poll!(signing.as_mut()).is_pending());

    let rpc = frame.last_of("rpcRequest").unwrap();
    assert_eq!(rpc["value"]["request"]["method"], "getLatestBlockhash");
    let id = rpc["value"]["id"].as_str().unwrap().to_string();
    assert!(popup.posted().is_empty());

    session.handle_message(inbound(
        "rpcResponse",
        json!({"id": id, "response": {"jsonrpc": "2.0", "result": {"value": {"blockhash": "Hash111"}}}}),
    ));
    assert!(poll!(signing.as_mut()).is_pending());

    let tx = forwarded(&popup);
    assert_eq!(tx["feePayer"], "Payer111");
    assert_eq!(tx["blockhash"], "Hash111");
    assert_eq!(tx["memo"], "gm");
    assert_eq!(
        popup.last_of("startSignTransaction").unwrap()["value"]["title"],
        "Demo dApp"
    );
    assert_eq!(hook.transaction().fee_payer.as_deref(), Some("Payer111"));

    session.handle_message(inbound(
        "finishSignTransaction",
        json!({"success": true, "transaction": signed(tx)}),
    ));
    let out = signing.await.unwrap();
    assert_eq!(out.signature.as_deref(), Some("sig111"));
    assert_eq!(out.memo, "gm");
    assert!(!session.is_modal_open());
}

#[tokio::test]
async fn existing_fields_are_kept() {
    let (session, frame) = common::loaded_session();
    session.handle_message(inbound("setUser", common::user("u1", "Payer111")));

    let tx = FakeTx {
        fee_payer: Some("Other222".into()),
        blockhash: Some("Preset333".into()),
        ..FakeTx::memo("gm")
    };
    let hook = SignTransactionHook::new(&session, tx);
    let mut signing = Box::pin(hook.sign_transaction());
    assert!(poll!(signing.as_mut()).is_pending());

    let popup = RecordingFrame::new();
    session.handle_message(inbound_from("requestSignTransaction", Value::Null, popup.clone()));
    assert!(poll!(signing.as_mut()).is_pending());

    assert!(frame.of_type("rpcRequest").is_empty());
    let tx = forwarded(&popup);
    assert_eq!(tx["feePayer"], "Other222");
    assert_eq!(tx["blockhash"], "Preset333");
}

#[tokio::test]
async fn custom_recency_source() {
    let (session, frame) = common::loaded_session();
    session.handle_message(inbound("setUser", common::user("u1", "Payer111")));
    let hook = SignTransactionHook::with_recency(
        &session,
        FakeTx::memo("gm"),
        Arc::new(FixedBlockhash("Fixed444")),
    );
    let mut signing = Box::pin(hook.sign_transaction());
    assert!(poll!(signing.as_mut()).is_pending());

    let popup = RecordingFrame::new();
    session.handle_message(inbound_from("requestSignTransaction", Value::Null, popup.clone()));
    assert!(poll!(signing.as_mut()).is_pending());

    assert!(frame.of_type("rpcRequest").is_empty());
    assert_eq!(forwarded(&popup)["blockhash"], "Fixed444");
}

#[tokio::test]
async fn failed_blockhash_lookup_rejects() {
    let (session, frame) = common::loaded_session();
    session.handle_message(inbound("setUser", common::user("u1", "Payer111")));
    let hook = SignTransactionHook::new(&session, FakeTx::memo("gm"));
    let mut signing = Box::pin(hook.sign_transaction());
    assert!(poll!(signing.as_mut()).is_pending());

    let popup = RecordingFrame::new();
    session.handle_message(inbound_from("requestSignTransaction", Value::Null, popup.clone()));
    assert!(poll!(signing.as_mut()).is_pending());

    let id = frame.last_of("rpcRequest").unwrap()["value"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    session.handle_message(inbound(
        "rpcResponse",
        json!({"id": id, "error": {"message": "node is behind"}}),
    ));

    let err = signing.await.unwrap_err();
    assert_eq!(err.code().as_str(), "RPC");
    assert!(popup.posted().is_empty());
    assert!(!session.is_modal_open());
    assert!(!hook.is_pending());
}

#[tokio::test]
async fn rejection_from_frame() {
    let (session, _frame) = common::loaded_session();
    let hook = SignTransactionHook::new(&session, FakeTx::memo("gm"));
    let mut signing = Box::pin(hook.sign_transaction());
    assert!(poll!(signing.as_mut()).is_pending());

    session.handle_message(inbound("finishSignTransaction", json!({"success": false})));
    assert_eq!(signing.await.unwrap_err().code().as_str(), "USER_REJECTED");
}

#[tokio::test]
async fn close_cancels_while_waiting_for_account() {
    let (session, _frame) = common::loaded_session();
    let hook = SignTransactionHook::new(&session, FakeTx::memo("gm"));
    let mut signing = Box::pin(hook.sign_transaction());
    assert!(poll!(signing.as_mut()).is_pending());

    session.close_modal();
    assert_eq!(signing.await.unwrap_err().code().as_str(), "CANCELLED");
}
