#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use comet_core::protocol::ChainType;
use comet_sdk::{config, ProviderConfig, Session};

#[test]
fn deny_unknown_fields() {
    let bad = r#"
publishable_key: "pk_1"
chain_tpye: evm # typo should fail
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("publishable_key: pk_1\n").expect("must parse");
    assert_eq!(cfg.iframe_base_url, "https://auth.withcomet.com");
    assert_eq!(cfg.chain_type, ChainType::Solana);
    assert_eq!(cfg.chain_id, 101);
    assert!(cfg.show_full_wallet);
    assert!(!cfg.accept_any_origin);
    assert_eq!(cfg.rpc_timeout_ms, 0);
}

#[test]
fn missing_publishable_key_is_fatal() {
    let err = config::load_from_str("chain_type: evm\n").unwrap_err();
    assert!(err.is_config());

    let mut cfg = ProviderConfig::new("   ");
    assert!(cfg.validate().is_err());
    cfg.publishable_key = None;
    assert!(Session::new(cfg).is_err());
}

#[test]
fn valid_chain_pairs_construct() {
    for (chain_type, chain_id) in [
        (ChainType::Solana, 101),
        (ChainType::Solana, 103),
        (ChainType::Evm, 1),
        (ChainType::Evm, 137),
        (ChainType::Aptos, 2),
    ] {
        let cfg = ProviderConfig::new("pk").with_chain(chain_type, chain_id);
        assert!(Session::new(cfg).is_ok(), "{chain_type}:{chain_id}");
    }
}

#[test]
fn invalid_chain_type_or_id_rejected() {
    for doc in [
        "publishable_key: pk\nchain_type: bitcoin\n",
        "publishable_key: pk\nchain_type: EVM\n",
        "publishable_key: pk\nchain_id: 1.5\n",
        "publishable_key: pk\nchain_id: \"one\"\n",
        "publishable_key: pk\nchain_id: -1\n",
    ] {
        let err = config::load_from_str(doc).expect_err(doc);
        assert!(err.is_config(), "{doc}");
    }
}

#[test]
fn construction_failure_sends_nothing() {
    let frame = common::RecordingFrame::new();
    let mut cfg = ProviderConfig::new("pk");
    cfg.iframe_base_url = "ftp://auth.withcomet.com".into();
    assert!(Session::with_frame(cfg, frame.clone()).is_err());
    assert!(frame.posted().is_empty());
}

#[test]
fn wildcard_origin_requires_opt_in() {
    let mut cfg = ProviderConfig::new("pk");
    cfg.target_origin = Some("*".into());
    assert!(cfg.validate().is_err());
    cfg.accept_any_origin = true;
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.outbound_origin().unwrap(), "*");
}

#[test]
fn frame_urls() {
    let cfg = ProviderConfig::new("pk")
        .with_base_url("http://localhost:3001/")
        .with_chain(ChainType::Evm, 1);
    assert_eq!(cfg.query(), "chainType=evm&chainId=1");
    assert_eq!(cfg.wallet_url(), "http://localhost:3001/gallery?chainType=evm&chainId=1");
    assert_eq!(
        cfg.login_url(),
        "http://localhost:3001/login?chainType=evm&chainId=1&hidden=true"
    );
    assert_eq!(cfg.frame_origin().unwrap(), "http://localhost:3001");

    let mut cfg = cfg;
    cfg.show_full_wallet = false;
    assert_eq!(cfg.path(), "/getwallet");
    assert_eq!(cfg.hello().path, "/getwallet");
}
