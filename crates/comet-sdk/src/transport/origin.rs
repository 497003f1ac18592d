//! Inbound origin policy.
//!
//! Window messages can come from any script on the page or any other frame.
//! Unless the host opts into `accept_any_origin`, only events whose origin
//! equals the wallet frame's origin are decoded.

/// Decision from policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Pass,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Exact match against a serialized origin (`scheme://host[:port]`).
    Exact(String),
    Any,
}

impl OriginPolicy {
    pub fn check(&self, origin: &str) -> PolicyDecision {
        match self {
            OriginPolicy::Any => PolicyDecision::Pass,
            OriginPolicy::Exact(expected) if expected == origin.trim_end_matches('/') => {
                PolicyDecision::Pass
            }
            OriginPolicy::Exact(_) => PolicyDecision::Drop,
        }
    }
}
