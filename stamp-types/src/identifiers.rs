//! Provider and platform identifiers
//!
//! Providers are the smallest verification unit (one external check, one
//! verdict). Platforms are named groupings of related providers shown
//! together. Both are closed, compile-time enumerations; there is no
//! runtime registration.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a single verification provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderId {
    /// ENS reverse-record existence check
    Ens,
    /// Self-staked amount >= 5 tokens
    SelfStakingBronze,
    /// Self-staked amount >= 20 tokens
    SelfStakingSilver,
    /// Self-staked amount >= 125 tokens
    SelfStakingGold,
}

impl ProviderId {
    /// All known provider identifiers, in registry order.
    pub const ALL: &'static [ProviderId] = &[
        ProviderId::Ens,
        ProviderId::SelfStakingBronze,
        ProviderId::SelfStakingSilver,
        ProviderId::SelfStakingGold,
    ];

    /// The wire/display name of this provider type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Ens => "Ens",
            ProviderId::SelfStakingBronze => "SelfStakingBronze",
            ProviderId::SelfStakingSilver => "SelfStakingSilver",
            ProviderId::SelfStakingGold => "SelfStakingGold",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

/// Identifier for a platform (a named grouping of related providers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformId {
    Ens,
    SelfStaking,
}

impl PlatformId {
    pub const ALL: &'static [PlatformId] = &[PlatformId::Ens, PlatformId::SelfStaking];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Ens => "Ens",
            PlatformId::SelfStaking => "SelfStaking",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}
