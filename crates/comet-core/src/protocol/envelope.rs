//! `{type, value}` envelopes exchanged with the wallet frame.
//!
//! Inbound text is parsed once into a `RawEnvelope` whose `value` stays a
//! `RawValue`; only envelope types the host understands get their payload
//! parsed. Everything else becomes `Inbound::Unknown` and is ignored by
//! callers.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{json, Value};

use crate::error::{CometError, Result};
use crate::protocol::mint::MintState;
use crate::protocol::modal::ModalRequest;
use crate::protocol::payload::ByteResult;
use crate::protocol::rpc::{RpcRequest, RpcResponse};
use crate::protocol::session::{SessionHello, User};

/// Every envelope type on the wire carries this prefix.
pub const TYPE_PREFIX: &str = "cometsdk_";

/// Undecoded inbound envelope.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub value: Option<Box<RawValue>>,
}

impl RawEnvelope {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| CometError::BadEnvelope(format!("invalid envelope json: {e}")))
    }

    /// Type name with the wire prefix removed, if it had one.
    pub fn short_type(&self) -> Option<&str> {
        self.msg_type.strip_prefix(TYPE_PREFIX)
    }

    fn value<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.value.as_deref().map(RawValue::get).unwrap_or("null");
        serde_json::from_str(raw)
            .map_err(|e| CometError::BadEnvelope(format!("{}: {e}", self.msg_type)))
    }
}

/// Completion of a capability request, reported by the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finish {
    pub success: bool,
    pub result: Option<ByteResult>,
}

impl Finish {
    fn decode(raw: &RawEnvelope, field: &str) -> Result<Self> {
        let mut obj: serde_json::Map<String, Value> = raw.value()?;
        // anything but an explicit `true` is a rejection
        let success = obj.get("success").and_then(Value::as_bool).unwrap_or(false);
        let result = match obj.remove(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value(v).map_err(|e| {
                CometError::BadEnvelope(format!("{}.{field}: {e}", raw.msg_type))
            })?),
        };
        Ok(Self { success, result })
    }

    /// `success=false` is a user rejection of `operation`.
    pub fn into_bytes(self, operation: &'static str) -> Result<Bytes> {
        if !self.success {
            return Err(CometError::UserRejected(operation));
        }
        self.result
            .ok_or_else(|| CometError::BadEnvelope(format!("{operation}: success without result")))?
            .into_bytes()
    }
}

/// Frame -> host envelopes.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    SetUser(Option<User>),
    ModalOpen(bool),
    CloseModal,
    Hello,
    ContentHeight(f64),
    MintState(MintState),
    RpcResponse(RpcResponse),
    OnLogin(Value),
    OnLogout(Value),
    Navigate(String),
    RequestSignMessage,
    FinishSignMessage(Finish),
    RequestSignTransaction,
    FinishSignTransaction(Finish),
    RequestEcdh,
    FinishEcdh(Finish),
    /// Type the host does not recognize (kept for logging).
    Unknown(String),
}

impl Inbound {
    /// Decode a parsed envelope. Unknown types are not an error.
    pub fn decode(raw: &RawEnvelope) -> Result<Self> {
        let Some(ty) = raw.short_type() else {
            return Ok(Inbound::Unknown(raw.msg_type.clone()));
        };

        let msg = match ty {
            "setUser" => Inbound::SetUser(raw.value()?),
            "modalOpen" => Inbound::ModalOpen(raw.value()?),
            "closeModal" => Inbound::CloseModal,
            "hello" => Inbound::Hello,
            "contentHeight" => Inbound::ContentHeight(raw.value()?),
            "mintState" => Inbound::MintState(MintState::from_value(raw.value()?)?),
            "rpcResponse" => Inbound::RpcResponse(raw.value()?),
            "onLogin" => Inbound::OnLogin(raw.value()?),
            "onLogout" => Inbound::OnLogout(raw.value()?),
            "navigate" => Inbound::Navigate(raw.value()?),
            "requestSignMessage" => Inbound::RequestSignMessage,
            "finishSignMessage" => Inbound::FinishSignMessage(Finish::decode(raw, "signature")?),
            "requestSignTransaction" => Inbound::RequestSignTransaction,
            "finishSignTransaction" => {
                Inbound::FinishSignTransaction(Finish::decode(raw, "transaction")?)
            }
            "requestECDH" => Inbound::RequestEcdh,
            "finishECDH" => Inbound::FinishEcdh(Finish::decode(raw, "sharedSecret")?),
            _ => Inbound::Unknown(raw.msg_type.clone()),
        };
        Ok(msg)
    }

    /// Parse and decode in one step.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::decode(&RawEnvelope::parse(text)?)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Inbound::Unknown(_))
    }
}

/// Host -> frame envelopes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    ModalOpen(bool),
    /// `None` tells the frame to drop its own pending UI.
    ModalRequest(Option<ModalRequest>),
    RpcRequest(RpcRequest),
    HelloBack(SessionHello),
    StartSignMessage { message: String, title: String },
    StartSignTransaction { transaction: String, title: String },
    StartEcdh { public_key: String, title: String },
}

#[derive(Serialize)]
struct Wire<'a> {
    #[serde(rename = "type")]
    msg_type: String,
    value: &'a Value,
}

impl Outbound {
    /// Type name without the wire prefix.
    pub fn short_type(&self) -> &'static str {
        match self {
            Outbound::ModalOpen(_) => "modalOpen",
            Outbound::ModalRequest(_) => "modalRequest",
            Outbound::RpcRequest(_) => "rpcRequest",
            Outbound::HelloBack(_) => "helloBack",
            Outbound::StartSignMessage { .. } => "startSignMessage",
            Outbound::StartSignTransaction { .. } => "startSignTransaction",
            Outbound::StartEcdh { .. } => "startECDH",
        }
    }

    fn payload(&self) -> Result<Value> {
        let encode = |e: serde_json::Error| CometError::Internal(format!("json encode failed: {e}"));
        let v = match self {
            Outbound::ModalOpen(open) => json!(open),
            Outbound::ModalRequest(req) => serde_json::to_value(req).map_err(encode)?,
            Outbound::RpcRequest(req) => serde_json::to_value(req).map_err(encode)?,
            Outbound::HelloBack(hello) => serde_json::to_value(hello).map_err(encode)?,
            Outbound::StartSignMessage { message, title } => {
                json!({ "message": message, "title": title })
            }
            Outbound::StartSignTransaction { transaction, title } => {
                json!({ "transaction": transaction, "title": title })
            }
            Outbound::StartEcdh { public_key, title } => {
                json!({ "publicKey": public_key, "title": title })
            }
        };
        Ok(v)
    }

    /// Full `{type, value}` object as posted to a window.
    pub fn to_value(&self) -> Result<Value> {
        let value = self.payload()?;
        serde_json::to_value(Wire {
            msg_type: format!("{TYPE_PREFIX}{}", self.short_type()),
            value: &value,
        })
        .map_err(|e| CometError::Internal(format!("json encode failed: {e}")))
    }
}
