//! Shared fixtures: a recording frame window and envelope builders.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use comet_sdk::{FrameWindow, MessageEvent, ProviderConfig, Session};

pub const ORIGIN: &str = "https://auth.withcomet.com";

/// Stores everything posted to it.
#[derive(Default)]
pub struct RecordingFrame {
    posted: Mutex<Vec<(Value, String)>>,
}

impl RecordingFrame {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().unwrap().iter().map(|(v, _)| v.clone()).collect()
    }

    /// Envelope types without the wire prefix, in send order.
    pub fn types(&self) -> Vec<String> {
        self.posted()
            .iter()
            .map(|v| {
                v["type"]
                    .as_str()
                    .unwrap()
                    .trim_start_matches("cometsdk_")
                    .to_string()
            })
            .collect()
    }

    pub fn of_type(&self, ty: &str) -> Vec<Value> {
        let full = format!("cometsdk_{ty}");
        self.posted()
            .into_iter()
            .filter(|v| v["type"] == full.as_str())
            .collect()
    }

    pub fn last_of(&self, ty: &str) -> Option<Value> {
        self.of_type(ty).pop()
    }

    pub fn origins(&self) -> Vec<String> {
        self.posted.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn clear(&self) {
        self.posted.lock().unwrap().clear();
    }
}

impl FrameWindow for RecordingFrame {
    fn post_message(&self, message: &Value, target_origin: &str) {
        self.posted
            .lock()
            .unwrap()
            .push((message.clone(), target_origin.to_string()));
    }
}

pub fn config() -> ProviderConfig {
    ProviderConfig::new("pk_test_123").with_app_title("Demo dApp")
}

/// Session with a mounted frame that has not said hello yet.
pub fn session() -> (Session, Arc<RecordingFrame>) {
    session_with(config())
}

pub fn session_with(cfg: ProviderConfig) -> (Session, Arc<RecordingFrame>) {
    let frame = RecordingFrame::new();
    let session = Session::with_frame(cfg, frame.clone()).unwrap();
    (session, frame)
}

/// Session whose frame already completed the hello handshake. The recorded
/// handshake traffic is cleared.
pub fn loaded_session() -> (Session, Arc<RecordingFrame>) {
    let (session, frame) = session();
    session.handle_message(inbound("hello", Value::Null));
    frame.clear();
    (session, frame)
}

pub fn envelope_text(ty: &str, value: Value) -> String {
    json!({ "type": format!("cometsdk_{ty}"), "value": value }).to_string()
}

pub fn inbound(ty: &str, value: Value) -> MessageEvent {
    MessageEvent::new(ORIGIN, envelope_text(ty, value))
}

pub fn inbound_from(ty: &str, value: Value, source: Arc<RecordingFrame>) -> MessageEvent {
    inbound(ty, value).with_source(source)
}

pub fn user(id: &str, address: &str) -> Value {
    json!({ "id": id, "address": address })
}
