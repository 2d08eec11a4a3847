//! Stamp aggregation: which platforms currently validate for an identity
//!
//! Control flow is linear: build the list of provider types still worth
//! checking, issue one batched check, then fold the static registry down
//! to the platforms whose groups have at least one surviving provider.
//! The filtering steps are pure functions, separable from transport.

use std::collections::HashSet;
use stamp_providers::registry::{registered_provider_ids, PLATFORMS};
use stamp_types::{PlatformId, ProviderId};
use tracing::{debug, warn};

use crate::check::CheckClient;

/// A provider whose check currently validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProvider {
    pub id: ProviderId,
    pub title: &'static str,
}

/// A provider group with at least one validated provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGroup {
    pub name: &'static str,
    pub providers: Vec<ValidatedProvider>,
}

/// A platform with at least one surviving group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPlatform {
    pub id: PlatformId,
    pub name: &'static str,
    pub groups: Vec<ValidatedGroup>,
}

/// Provider types to include in the outbound batch: everything registered,
/// minus the types the identity has already satisfied.
pub fn types_to_check(held: &[ProviderId]) -> Vec<ProviderId> {
    registered_provider_ids()
        .into_iter()
        .filter(|id| !held.contains(id))
        .collect()
}

/// Fold the static registry down to the platforms whose groups contain at
/// least one provider marked valid. Empty groups and empty platforms are
/// dropped entirely.
pub fn filter_platforms(valid: &HashSet<ProviderId>) -> Vec<ValidatedPlatform> {
    PLATFORMS
        .iter()
        .filter_map(|platform| {
            let groups: Vec<ValidatedGroup> = platform
                .groups
                .iter()
                .filter_map(|group| {
                    let providers: Vec<ValidatedProvider> = group
                        .providers
                        .iter()
                        .filter(|spec| valid.contains(&spec.id))
                        .map(|spec| ValidatedProvider {
                            id: spec.id,
                            title: spec.title,
                        })
                        .collect();
                    (!providers.is_empty()).then_some(ValidatedGroup {
                        name: group.name,
                        providers,
                    })
                })
                .collect();
            (!groups.is_empty()).then_some(ValidatedPlatform {
                id: platform.id,
                name: platform.name,
                groups,
            })
        })
        .collect()
}

/// The stamp aggregator.
pub struct StampAggregator {
    check: CheckClient,
}

impl StampAggregator {
    pub fn new(check: CheckClient) -> Self {
        Self { check }
    }

    /// Determine which platforms' provider groups currently validate for
    /// `address`, excluding provider types in `held`.
    ///
    /// Transport and decode failures downgrade to an empty result: this
    /// path only drives optional UI suggestions, so a dead verifier must
    /// not take the caller down with it.
    pub async fn possible_stamps(
        &self,
        address: &str,
        held: &[ProviderId],
    ) -> Vec<ValidatedPlatform> {
        let types = types_to_check(held);
        if types.is_empty() {
            debug!(address, "all provider types already held, nothing to check");
            return Vec::new();
        }

        let items = match self.check.check(address, &types).await {
            Ok(items) => items,
            Err(e) => {
                warn!(address, error = %e, "batched check failed, returning no suggestions");
                return Vec::new();
            }
        };

        let valid: HashSet<ProviderId> = items
            .iter()
            .filter(|item| item.valid)
            .filter_map(|item| item.kind.parse().ok())
            .collect();

        filter_platforms(&valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_to_check_excludes_held() {
        let held = [ProviderId::Ens, ProviderId::SelfStakingSilver];
        let types = types_to_check(&held);
        assert!(!types.contains(&ProviderId::Ens));
        assert!(!types.contains(&ProviderId::SelfStakingSilver));
        assert!(types.contains(&ProviderId::SelfStakingBronze));
        assert!(types.contains(&ProviderId::SelfStakingGold));
    }

    #[test]
    fn test_types_to_check_with_nothing_held_is_everything() {
        assert_eq!(types_to_check(&[]).len(), ProviderId::ALL.len());
    }

    #[test]
    fn test_filter_platforms_drops_empty_platforms() {
        let valid: HashSet<ProviderId> = [ProviderId::Ens].into_iter().collect();
        let platforms = filter_platforms(&valid);

        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].id, PlatformId::Ens);
        assert_eq!(platforms[0].groups.len(), 1);
        assert_eq!(platforms[0].groups[0].providers[0].id, ProviderId::Ens);
    }

    #[test]
    fn test_filter_platforms_keeps_partial_groups() {
        let valid: HashSet<ProviderId> =
            [ProviderId::SelfStakingBronze, ProviderId::SelfStakingSilver]
                .into_iter()
                .collect();
        let platforms = filter_platforms(&valid);

        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].id, PlatformId::SelfStaking);
        let providers: Vec<ProviderId> = platforms[0].groups[0]
            .providers
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(
            providers,
            vec![ProviderId::SelfStakingBronze, ProviderId::SelfStakingSilver]
        );
    }

    #[test]
    fn test_filter_platforms_nothing_valid_is_empty() {
        assert!(filter_platforms(&HashSet::new()).is_empty());
    }
}
