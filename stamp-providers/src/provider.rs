//! The provider contract

use async_trait::async_trait;
use stamp_types::{ProviderId, Result, VerifiedPayload, VerifyRequest};

/// A single verification provider: one external check, one verdict.
///
/// `verify` performs exactly one adapter lookup and applies one fixed
/// decision rule. No state is retained between invocations. Any failure of
/// the adapter (transport, malformed response, missing field) must be
/// re-raised as `Error::ExternalVerification` tagged with this provider's
/// identifier; only a well-formed check that fails its rule produces a
/// `valid = false` payload.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The identifier under which this provider is registered.
    fn id(&self) -> ProviderId;

    /// Run the check for the given request.
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifiedPayload>;
}
