//! Batched verification check client
//!
//! Wire format: POST to `<base>/v<version>/check` with body
//! `{ "payload": { "type": "bulk", "types": [...], "address": ..., "version": ... } }`;
//! the response is an array of `{ "type": ..., "valid": ... }` entries.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stamp_types::{Error, ProviderId, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The batched check request payload.
#[derive(Debug, Clone, Serialize)]
pub struct CheckPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub types: Vec<ProviderId>,
    pub address: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
struct CheckRequestBody {
    payload: CheckPayload,
}

/// One entry of the check response. The type comes back as a plain string
/// so unknown provider types can be skipped rather than failing the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub valid: bool,
}

/// HTTP client for the batched check endpoint.
pub struct CheckClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
}

impl CheckClient {
    pub fn new(base_url: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, version, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            version: version.into(),
        })
    }

    /// Issue one batched check naming the provider types to verify.
    pub async fn check(&self, address: &str, types: &[ProviderId]) -> Result<Vec<CheckItem>> {
        let url = format!(
            "{}/v{}/check",
            self.base_url.trim_end_matches('/'),
            self.version
        );

        let body = CheckRequestBody {
            payload: CheckPayload {
                kind: "bulk",
                types: types.to_vec(),
                address: address.to_string(),
                version: self.version.clone(),
            },
        };

        self.http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}
