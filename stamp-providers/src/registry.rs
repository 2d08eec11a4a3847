//! Static platform/provider registry
//!
//! Platform descriptors are compile-time tables keyed by enumerated
//! identifiers and read-only for the lifetime of the process. The
//! aggregator walks these tables to decide which checks to batch and how
//! to group surviving providers for display.

use stamp_types::{PlatformId, ProviderId};

/// One registered provider with its display title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec {
    pub id: ProviderId,
    pub title: &'static str,
}

/// A named group of related providers within a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: &'static str,
    pub providers: &'static [ProviderSpec],
}

/// A platform: a named grouping of provider groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSpec {
    pub id: PlatformId,
    pub name: &'static str,
    pub groups: &'static [GroupSpec],
}

/// All registered platforms, in display order.
pub static PLATFORMS: &[PlatformSpec] = &[
    PlatformSpec {
        id: PlatformId::Ens,
        name: "ENS",
        groups: &[GroupSpec {
            name: "Account Name",
            providers: &[ProviderSpec {
                id: ProviderId::Ens,
                title: "Ethereum Name Service (reverse record)",
            }],
        }],
    },
    PlatformSpec {
        id: PlatformId::SelfStaking,
        name: "Self Staking",
        groups: &[GroupSpec {
            name: "Staking Tiers",
            providers: &[
                ProviderSpec {
                    id: ProviderId::SelfStakingBronze,
                    title: "Bronze (5 tokens)",
                },
                ProviderSpec {
                    id: ProviderId::SelfStakingSilver,
                    title: "Silver (20 tokens)",
                },
                ProviderSpec {
                    id: ProviderId::SelfStakingGold,
                    title: "Gold (125 tokens)",
                },
            ],
        }],
    },
];

/// Look up a platform descriptor by identifier.
pub fn platform(id: PlatformId) -> Option<&'static PlatformSpec> {
    PLATFORMS.iter().find(|p| p.id == id)
}

/// Every provider identifier reachable through the registry, in order.
pub fn registered_provider_ids() -> Vec<ProviderId> {
    PLATFORMS
        .iter()
        .flat_map(|p| p.groups)
        .flat_map(|g| g.providers)
        .map(|spec| spec.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_platform_id_is_registered() {
        for id in PlatformId::ALL {
            assert!(platform(*id).is_some(), "platform {} missing", id);
        }
    }

    #[test]
    fn test_registered_providers_are_unique_and_complete() {
        let ids = registered_provider_ids();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate provider registration");
        assert_eq!(unique.len(), ProviderId::ALL.len());
    }

    #[test]
    fn test_no_empty_groups() {
        for p in PLATFORMS {
            assert!(!p.groups.is_empty());
            for g in p.groups {
                assert!(!g.providers.is_empty());
            }
        }
    }
}
