//! Core types for the stamp verification system
//!
//! This crate defines the shared data model used by the verification
//! providers and the stamp aggregator: request/verdict payloads, provider
//! and platform identifiers, and the crate-wide error type.

pub mod error;
pub mod identifiers;
pub mod payload;

pub use error::{Error, Result};
pub use identifiers::{PlatformId, ProviderId};
pub use payload::{parse_address, to_lowercase_hex, Evidence, VerifiedPayload, VerifyRequest};
