//! Modal request descriptors shown inside the wallet frame.

use serde::{Deserialize, Serialize};

/// Which privileged flow the frame should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalRequestKind {
    SignMessage,
    SignTransaction,
    #[serde(rename = "ecdh")]
    Ecdh,
    Mint,
}

impl ModalRequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModalRequestKind::SignMessage => "signMessage",
            ModalRequestKind::SignTransaction => "signTransaction",
            ModalRequestKind::Ecdh => "ecdh",
            ModalRequestKind::Mint => "mint",
        }
    }
}

/// Request-specific configuration forwarded to the frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// The single pending request owned by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalRequest {
    #[serde(rename = "type")]
    pub kind: ModalRequestKind,
    pub closeable: bool,
    #[serde(default)]
    pub config: ModalConfig,
}

impl ModalRequest {
    /// Non-closeable capability request (sign message / transaction / ECDH).
    pub fn capability(kind: ModalRequestKind, app_title: impl Into<String>) -> Self {
        Self {
            kind,
            closeable: false,
            config: ModalConfig {
                app_title: Some(app_title.into()),
                collection_id: None,
            },
        }
    }

    /// Closeable mint flow for one collection.
    pub fn mint(collection_id: impl Into<String>) -> Self {
        Self {
            kind: ModalRequestKind::Mint,
            closeable: true,
            config: ModalConfig {
                app_title: None,
                collection_id: Some(collection_id.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let req = ModalRequest::capability(ModalRequestKind::Ecdh, "Demo");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["type"], "ecdh");
        assert_eq!(v["closeable"], false);
        assert_eq!(v["config"]["appTitle"], "Demo");
        assert!(v["config"].get("collectionId").is_none());
    }

    #[test]
    fn mint_request_is_closeable() {
        let req = ModalRequest::mint("col_1");
        assert!(req.closeable);
        assert_eq!(req.kind.as_str(), "mint");
        assert_eq!(req.config.collection_id.as_deref(), Some("col_1"));
    }
}
