//! Mint snapshots pushed by the frame while a mint flow is open.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CometError, Result};
use crate::protocol::session::{ChainType, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    #[serde(default)]
    pub num_minted: u64,
    #[serde(default)]
    pub total_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub chain_type: Option<ChainType>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub infinite_supply: bool,
    #[serde(default)]
    pub max_supply: u64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub pricing_model: String,
    #[serde(default)]
    pub deployed: bool,
    #[serde(default)]
    pub is_comet_token: bool,
    #[serde(default)]
    pub background_upload: String,
    #[serde(default)]
    pub stats: CollectionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintData {
    #[serde(default)]
    pub mint_id: String,
    #[serde(default)]
    pub mint_status: String,
    #[serde(default)]
    pub mint_pubkey: String,
    #[serde(default)]
    pub payment_amount: f64,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub token: Value,
}

/// Latest collection + mint progress. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintState {
    #[serde(default)]
    pub collection: Option<Collection>,
    #[serde(default)]
    pub mint_data: Option<MintData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl MintState {
    /// Older frames send the snapshot as a JSON-encoded string.
    pub fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::String(s) => serde_json::from_str(&s)
                .map_err(|e| CometError::BadEnvelope(format!("mintState string: {e}")))?,
            other => other,
        };
        serde_json::from_value(value)
            .map_err(|e| CometError::BadEnvelope(format!("mintState: {e}")))
    }

    pub fn mint_status(&self) -> Option<&str> {
        self.mint_data
            .as_ref()
            .map(|d| d.mint_status.as_str())
            .filter(|s| !s.is_empty())
    }
}
