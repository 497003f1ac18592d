use serde::Deserialize;
use url::Url;

use comet_core::error::{CometError, Result};
use comet_core::protocol::{ChainType, SessionHello};

/// Wildcard target origin. Only honored together with `accept_any_origin`.
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_iframe_base_url")]
    pub iframe_base_url: String,

    #[serde(default)]
    pub chain_type: ChainType,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_show_full_wallet")]
    pub show_full_wallet: bool,

    #[serde(default)]
    pub publishable_key: Option<String>,

    /// Title shown by the frame next to signing prompts.
    #[serde(default)]
    pub app_title: String,

    /// Explicit origin for outbound messages. Defaults to the base URL's origin.
    #[serde(default)]
    pub target_origin: Option<String>,

    /// Skip inbound origin checks. Allows a `*` target origin.
    #[serde(default)]
    pub accept_any_origin: bool,

    /// 0 disables the RPC timeout.
    #[serde(default)]
    pub rpc_timeout_ms: u64,

    #[serde(default = "default_max_pending_rpc")]
    pub max_pending_rpc: usize,
}

impl ProviderConfig {
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            iframe_base_url: default_iframe_base_url(),
            chain_type: ChainType::default(),
            chain_id: default_chain_id(),
            show_full_wallet: default_show_full_wallet(),
            publishable_key: Some(publishable_key.into()),
            app_title: String::new(),
            target_origin: None,
            accept_any_origin: false,
            rpc_timeout_ms: 0,
            max_pending_rpc: default_max_pending_rpc(),
        }
    }

    pub fn with_chain(mut self, chain_type: ChainType, chain_id: u64) -> Self {
        self.chain_type = chain_type;
        self.chain_id = chain_id;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.iframe_base_url = url.into();
        self
    }

    pub fn with_app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = title.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.publishable_key.as_deref() {
            Some(k) if !k.trim().is_empty() => {}
            _ => return Err(CometError::MissingPublishableKey),
        }

        self.base_url()?;

        if let Some(origin) = self.target_origin.as_deref() {
            if origin == ANY_ORIGIN {
                if !self.accept_any_origin {
                    return Err(CometError::InvalidConfig(
                        "target_origin \"*\" requires accept_any_origin".into(),
                    ));
                }
            } else {
                parse_http_url("target_origin", origin)?;
            }
        }

        if self.max_pending_rpc == 0 {
            return Err(CometError::InvalidConfig(
                "max_pending_rpc must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> Result<Url> {
        parse_http_url("iframe_base_url", &self.iframe_base_url)
    }

    /// Wallet path selected by `show_full_wallet`.
    pub fn path(&self) -> &'static str {
        if self.show_full_wallet {
            "/gallery"
        } else {
            "/getwallet"
        }
    }

    /// `chainType=..&chainId=..`
    pub fn query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("chainType", self.chain_type.as_str())
            .append_pair("chainId", &self.chain_id.to_string())
            .finish()
    }

    fn base(&self) -> &str {
        self.iframe_base_url.trim_end_matches('/')
    }

    /// Source of the visible wallet frame.
    pub fn wallet_url(&self) -> String {
        format!("{}{}?{}", self.base(), self.path(), self.query())
    }

    /// Source of the hidden login frame.
    pub fn login_url(&self) -> String {
        format!("{}/login?{}&hidden=true", self.base(), self.query())
    }

    /// Origin of the hosted frame, e.g. `https://auth.withcomet.com`.
    pub fn frame_origin(&self) -> Result<String> {
        Ok(self.base_url()?.origin().ascii_serialization())
    }

    /// Origin outbound messages are addressed to.
    pub fn outbound_origin(&self) -> Result<String> {
        match self.target_origin.as_deref() {
            Some(ANY_ORIGIN) => Ok(ANY_ORIGIN.to_string()),
            Some(origin) => Ok(parse_http_url("target_origin", origin)?
                .origin()
                .ascii_serialization()),
            None => self.frame_origin(),
        }
    }

    /// Reply sent to the frame once it says hello.
    pub fn hello(&self) -> SessionHello {
        SessionHello {
            chain_type: self.chain_type,
            chain_id: self.chain_id,
            path: self.path().to_string(),
            publishable_key: self.publishable_key.clone(),
            query: self.query(),
        }
    }
}

fn parse_http_url(field: &str, s: &str) -> Result<Url> {
    let url = Url::parse(s)
        .map_err(|e| CometError::InvalidConfig(format!("{field} is not a valid url: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CometError::InvalidConfig(format!(
            "{field} must use http or https (got {other})"
        ))),
    }
}

fn default_iframe_base_url() -> String {
    "https://auth.withcomet.com".into()
}
fn default_chain_id() -> u64 {
    101
}
fn default_show_full_wallet() -> bool {
    true
}
fn default_max_pending_rpc() -> usize {
    1024
}
