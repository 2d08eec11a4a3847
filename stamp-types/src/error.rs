//! Error types for stamp verification

use crate::identifiers::ProviderId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while verifying a stamp.
///
/// Two classes exist: `ExternalVerification` covers everything that went
/// wrong while talking to (or interpreting) an external data source and is
/// always tagged with the provider that raised it. The remaining variants
/// are the untagged adapter-level causes that providers wrap before
/// surfacing. A check that merely fails its threshold or existence rule is
/// *not* an error; it is a normal `VerifiedPayload` with `valid = false`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{provider}: {message}")]
    ExternalVerification {
        provider: ProviderId,
        message: String,
    },

    #[error("Not a proper address.")]
    InvalidAddress,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown provider type: {0}")]
    UnknownProvider(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an adapter-level failure as an external verification error
    /// tagged with the provider's name and the proximate error text.
    pub fn external(provider: ProviderId, cause: impl std::fmt::Display) -> Self {
        Error::ExternalVerification {
            provider,
            message: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_error_names_provider_and_cause() {
        let err = Error::external(ProviderId::SelfStakingBronze, Error::InvalidAddress);
        let text = err.to_string();
        assert!(text.contains("SelfStakingBronze"));
        assert!(text.contains("Not a proper address."));
    }

    #[test]
    fn test_transport_error_text_preserved() {
        let err = Error::external(ProviderId::Ens, "connection refused");
        assert_eq!(err.to_string(), "Ens: connection refused");
    }
}
