//! Hex pathway round-trips for message payloads.

#![allow(clippy::unwrap_used)]

use comet_core::protocol::payload::{from_hex, to_hex};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

#[test]
fn hex_reproduces_bytes() {
    for len in [0usize, 1, 1000] {
        let bytes = pattern(len);
        let encoded = to_hex(&bytes);
        assert_eq!(encoded.len(), len * 2);
        assert_eq!(from_hex(&encoded).unwrap().as_ref(), bytes.as_slice(), "len={len}");
    }
}

#[test]
fn utf8_message_is_hex_of_its_bytes() {
    assert_eq!(to_hex("hi comet".as_bytes()), "686920636f6d6574");
    assert_eq!(to_hex("é".as_bytes()), "c3a9");
}
