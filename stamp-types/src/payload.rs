//! Verification request and verdict payloads

use crate::error::{Error, Result};
use alloy_primitives::{hex, Address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Evidence recorded alongside a passing verdict.
///
/// Key/value facts (e.g. the resolved ENS name, the staking tier tag) that
/// downstream credential issuance consumes. A `BTreeMap` keeps the
/// serialized form deterministic.
pub type Evidence = BTreeMap<String, String>;

/// A single-use verification request: a chain address plus optional
/// provider-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// The address whose identity is being verified
    pub address: String,

    /// Staking round to query (staking providers only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,

    /// Node endpoint override for providers that read chain state;
    /// falls back to the configured endpoint when absent
    #[serde(rename = "rpcUrl", default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
}

impl VerifyRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            round: None,
            rpc_url: None,
        }
    }

    pub fn with_round(mut self, round: impl Into<String>) -> Self {
        self.round = Some(round.into());
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }
}

/// The verdict produced by one provider check.
///
/// Invariants, enforced by the `passing`/`failing` constructors:
/// - `valid == true` implies `errors` is empty and `record` is present
/// - `valid == false` implies `record` is `None` and `errors` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedPayload {
    /// Whether the check passed
    pub valid: bool,

    /// Human-readable reasons the check failed (empty when valid)
    pub errors: Vec<String>,

    /// Evidence recorded for credential issuance (absent when invalid)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Evidence>,
}

impl VerifiedPayload {
    /// A passing verdict carrying the evidence record.
    pub fn passing(record: Evidence) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            record: Some(record),
        }
    }

    /// A failing verdict carrying at least one explanatory error string.
    pub fn failing(errors: Vec<String>) -> Self {
        debug_assert!(!errors.is_empty(), "failing verdict requires a reason");
        Self {
            valid: false,
            errors,
            record: None,
        }
    }

    /// Check the structural invariant relating `valid`, `errors`, `record`.
    pub fn is_consistent(&self) -> bool {
        if self.valid {
            self.errors.is_empty() && self.record.is_some()
        } else {
            self.record.is_none() && !self.errors.is_empty()
        }
    }
}

/// Parse a user-supplied chain address.
///
/// Accepts 40 hex characters with or without a `0x` prefix, any casing.
/// Malformed input is a client-input error, deliberately distinct from a
/// `valid=false` verdict.
pub fn parse_address(input: &str) -> Result<Address> {
    Address::from_str(input.trim()).map_err(|_| Error::InvalidAddress)
}

/// Canonical lowercased `0x`-prefixed form of an address, as used in
/// subgraph queries and evidence records.
pub fn to_lowercase_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}
