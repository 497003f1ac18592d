//! Session-level payloads: chain selection, the readiness reply, and the
//! authenticated user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CometError;

/// Chain family the wallet frame operates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Evm,
    #[default]
    Solana,
    Aptos,
}

impl ChainType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainType::Evm => "evm",
            ChainType::Solana => "solana",
            ChainType::Aptos => "aptos",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = CometError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evm" => Ok(ChainType::Evm),
            "solana" => Ok(ChainType::Solana),
            "aptos" => Ok(ChainType::Aptos),
            other => Err(CometError::InvalidConfig(format!(
                "chain_type must be one of evm, solana, aptos (got {other:?})"
            ))),
        }
    }
}

/// What a login/wallet button opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Login,
    Gallery,
    Mint,
}

impl FromStr for ButtonAction {
    type Err = CometError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(ButtonAction::Login),
            "gallery" => Ok(ButtonAction::Gallery),
            "mint" => Ok(ButtonAction::Mint),
            other => Err(CometError::InvalidConfig(format!(
                "action must be one of login, gallery, mint (got {other:?})"
            ))),
        }
    }
}

/// Reply to the frame's `hello`, carrying the session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHello {
    pub chain_type: ChainType,
    pub chain_id: u64,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
    pub query: String,
}

/// Account details attached to a login result by older frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAccount {
    pub address: String,
    #[serde(default)]
    pub chain_type: Option<ChainType>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// A user's address: a bare string, or the older account object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Plain(String),
    Account(LoginAccount),
}

impl Address {
    pub fn as_str(&self) -> &str {
        match self {
            Address::Plain(s) => s,
            Address::Account(a) => &a.address,
        }
    }
}

/// Authenticated identity pushed by the frame.
///
/// Fields the host does not model are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Empty when the frame sent none. Numeric ids are kept as their decimal text.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn address(&self) -> Option<&str> {
        self.address.as_ref().map(Address::as_str)
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn chain_type_parse() {
        assert_eq!("evm".parse::<ChainType>().unwrap(), ChainType::Evm);
        assert_eq!("aptos".parse::<ChainType>().unwrap(), ChainType::Aptos);
        let err = "bitcoin".parse::<ChainType>().unwrap_err();
        assert!(err.is_config());
        assert!("Solana".parse::<ChainType>().is_err());
    }

    #[test]
    fn button_action_parse() {
        assert_eq!("mint".parse::<ButtonAction>().unwrap(), ButtonAction::Mint);
        assert!("logout".parse::<ButtonAction>().unwrap_err().is_config());
    }

    #[test]
    fn user_address_both_shapes() {
        let plain: User =
            serde_json::from_value(json!({ "id": "u1", "address": "AbC", "email": "x@y" }))
                .unwrap();
        assert_eq!(plain.address(), Some("AbC"));
        assert_eq!(plain.extra["email"], "x@y");

        let old: User = serde_json::from_value(json!({
            "id": "u2",
            "username": "sam",
            "address": { "address": "0x01", "chainType": "evm", "chainId": 1 }
        }))
        .unwrap();
        assert_eq!(old.address(), Some("0x01"));
        assert_eq!(old.username.as_deref(), Some("sam"));
    }

    #[test]
    fn user_id_may_be_numeric_or_missing() {
        let numeric: User = serde_json::from_value(json!({ "id": 42, "address": "AbC" })).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.address(), Some("AbC"));

        let missing: User = serde_json::from_value(json!({ "email": "x@y" })).unwrap();
        assert_eq!(missing.id, "");
        assert_eq!(missing.extra["email"], "x@y");
    }
}
