//! Minimal JSON-RPC 2.0 client for Ethereum node endpoints

use alloy_primitives::{hex, Address};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use stamp_types::{Error, Result};
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client over HTTP.
///
/// One outbound POST per `call`; no retries, no connection state beyond
/// reqwest's own pooling.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Issue a single JSON-RPC call and return the `result` value.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, url = %self.url, "issuing JSON-RPC call");

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if let Some(err) = response.error {
            return Err(Error::Rpc(format!("{} (code {})", err.message, err.code)));
        }

        response
            .result
            .ok_or_else(|| Error::MalformedResponse("RPC response has no result".to_string()))
    }

    /// `eth_call` against a contract, returning the raw return data.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            {
                "to": format!("0x{}", hex::encode(to)),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest",
        ]);

        let result = self.call("eth_call", params).await?;
        let text = result
            .as_str()
            .ok_or_else(|| Error::MalformedResponse("eth_call result is not a string".to_string()))?;

        hex::decode(text)
            .map_err(|e| Error::MalformedResponse(format!("eth_call returned invalid hex: {}", e)))
    }
}
