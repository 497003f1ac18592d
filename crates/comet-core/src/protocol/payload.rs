//! Transport-safe encodings for byte payloads.
//!
//! Messages and serialized transactions travel as lowercase hex. Raw public
//! keys travel as base58. Byte results coming back from the frame are accepted
//! either as a hex string or as a JSON array of bytes.

use bytes::Bytes;
use serde::Deserialize;

use crate::error::{CometError, Result};

/// Hex-encode bytes for a start envelope.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex produced by `to_hex`. A leading `0x` is tolerated.
pub fn from_hex(s: &str) -> Result<Bytes> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(trimmed)
        .map(Bytes::from)
        .map_err(|e| CometError::Encoding(format!("invalid hex: {e}")))
}

/// Public key handed to an ECDH request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyInput {
    /// Already encoded; forwarded untouched.
    Encoded(String),
    /// Raw key bytes; base58-encoded on the wire.
    Raw(Bytes),
}

impl PublicKeyInput {
    pub fn to_wire(&self) -> String {
        match self {
            PublicKeyInput::Encoded(s) => s.clone(),
            PublicKeyInput::Raw(b) => bs58::encode(b).into_string(),
        }
    }
}

impl From<String> for PublicKeyInput {
    fn from(s: String) -> Self {
        PublicKeyInput::Encoded(s)
    }
}

impl From<&str> for PublicKeyInput {
    fn from(s: &str) -> Self {
        PublicKeyInput::Encoded(s.to_owned())
    }
}

impl From<Vec<u8>> for PublicKeyInput {
    fn from(b: Vec<u8>) -> Self {
        PublicKeyInput::Raw(Bytes::from(b))
    }
}

impl From<Bytes> for PublicKeyInput {
    fn from(b: Bytes) -> Self {
        PublicKeyInput::Raw(b)
    }
}

/// Byte result carried by a finish envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ByteResult {
    Hex(String),
    Array(Vec<u8>),
}

impl ByteResult {
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            ByteResult::Hex(s) => from_hex(&s),
            ByteResult::Array(v) => Ok(Bytes::from(v)),
        }
    }
}
