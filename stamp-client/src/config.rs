//! Endpoint configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfig {
    /// JSON-RPC node endpoint for chain lookups
    pub rpc_url: String,

    /// Staking subgraph endpoint
    pub subgraph_url: String,

    /// Batched check verifier
    pub verifier: VerifierConfig,

    /// Per-request HTTP timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Base URL; `/v<version>/check` is appended
    pub base_url: String,

    /// Protocol version sent with every batched check
    pub version: String,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            subgraph_url: "http://127.0.0.1:8000/subgraphs/name/staking".to_string(),
            verifier: VerifierConfig {
                base_url: "http://127.0.0.1:8003".to_string(),
                version: "0.0.0".to_string(),
            },
            timeout_secs: 30,
        }
    }
}

impl StampConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: StampConfig = toml::from_str(&contents)?;

        // Environment overrides the file for the node endpoint
        if let Ok(rpc_url) = std::env::var("STAMP_RPC_URL") {
            config.rpc_url = rpc_url;
        }

        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
