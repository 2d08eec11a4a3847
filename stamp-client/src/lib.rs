//! Stamp aggregator client library
//!
//! Given an identity and the set of configured platforms, determine which
//! platforms' provider groups currently validate. One batched check request
//! goes out per aggregation; transport failures soft-fail to an empty
//! result since this path only feeds optional UI suggestions.

pub mod aggregator;
pub mod check;
pub mod config;

pub use aggregator::{
    filter_platforms, types_to_check, StampAggregator, ValidatedGroup, ValidatedPlatform,
    ValidatedProvider,
};
pub use check::{CheckClient, CheckItem, CheckPayload};
pub use config::{StampConfig, VerifierConfig};
