//! Self-staking threshold providers
//!
//! Three tiered providers over one subgraph lookup: the user's self-staked
//! amount for the round is compared against a fixed tier constant. Amounts
//! are 18-decimal base-unit strings that can exceed native integer
//! precision, so comparison uses `U256`. A tie with the threshold passes.

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use stamp_types::{
    parse_address, to_lowercase_hex, Error, Evidence, ProviderId, Result, VerifiedPayload,
    VerifyRequest,
};

use crate::provider::Provider;

/// Staking round queried when the request does not specify one.
pub const DEFAULT_ROUND: &str = "1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter seam for the subgraph indexer: POST one GraphQL query, return
/// the raw JSON body.
#[async_trait]
pub trait SubgraphClient: Send + Sync {
    async fn query(&self, query: &str) -> Result<Value>;
}

/// Production subgraph adapter over HTTP.
pub struct HttpSubgraph {
    http: reqwest::Client,
    url: String,
}

impl HttpSubgraph {
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
}

#[async_trait]
impl SubgraphClient for HttpSubgraph {
    async fn query(&self, query: &str) -> Result<Value> {
        self.http
            .post(&self.url)
            .json(&json!({ "query": query }))
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

/// The fixed query template, parameterized by lowercased address and round.
pub fn stake_query(address: &str, round: &str) -> String {
    format!(
        r#"{{
  users(where: {{address: "{address}"}}) {{
    stakes(where: {{round: "{round}"}}) {{
      stake
    }}
    xstakeAggregates(where: {{round: "{round}"}}) {{
      total
    }}
  }}
}}"#
    )
}

/// Subgraph response shape:
/// `{ data: { users: [ { stakes: [ { stake } ], xstakeAggregates: [...] } ] } }`.
///
/// `stakes` is deliberately non-defaulted: a user entry without it is a
/// malformed response, not a zero stake.
#[derive(Debug, Clone, Deserialize)]
pub struct StakeResponse {
    pub data: StakeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakeData {
    pub users: Vec<UserStakes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStakes {
    pub stakes: Vec<StakeEntry>,
    #[serde(rename = "xstakeAggregates", default)]
    pub xstake_aggregates: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakeEntry {
    pub stake: String,
}

/// Staking tiers and their token thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakingTier {
    Bronze,
    Silver,
    Gold,
}

impl StakingTier {
    pub const ALL: &'static [StakingTier] =
        &[StakingTier::Bronze, StakingTier::Silver, StakingTier::Gold];

    /// Threshold in whole tokens.
    pub fn tokens(self) -> u64 {
        match self {
            StakingTier::Bronze => 5,
            StakingTier::Silver => 20,
            StakingTier::Gold => 125,
        }
    }

    /// Threshold in 18-decimal base units.
    pub fn threshold(self) -> U256 {
        U256::from(self.tokens()) * U256::from(10u64).pow(U256::from(18u64))
    }

    /// Evidence tag recorded when this tier's check passes.
    pub fn evidence_tag(self) -> &'static str {
        match self {
            StakingTier::Bronze => "ssgte5",
            StakingTier::Silver => "ssgte20",
            StakingTier::Gold => "ssgte125",
        }
    }

    pub fn provider_id(self) -> ProviderId {
        match self {
            StakingTier::Bronze => ProviderId::SelfStakingBronze,
            StakingTier::Silver => ProviderId::SelfStakingSilver,
            StakingTier::Gold => ProviderId::SelfStakingGold,
        }
    }
}

/// Threshold provider for one staking tier.
pub struct SelfStakingProvider {
    tier: StakingTier,
    subgraph: Arc<dyn SubgraphClient>,
}

impl SelfStakingProvider {
    pub fn new(tier: StakingTier, subgraph: Arc<dyn SubgraphClient>) -> Self {
        Self { tier, subgraph }
    }

    pub fn bronze(subgraph: Arc<dyn SubgraphClient>) -> Self {
        Self::new(StakingTier::Bronze, subgraph)
    }

    pub fn silver(subgraph: Arc<dyn SubgraphClient>) -> Self {
        Self::new(StakingTier::Silver, subgraph)
    }

    pub fn gold(subgraph: Arc<dyn SubgraphClient>) -> Self {
        Self::new(StakingTier::Gold, subgraph)
    }

    /// Total self-staked amount from the first user entry.
    fn staked_amount(&self, response: &StakeResponse) -> Result<U256> {
        let user = response.data.users.first().ok_or_else(|| {
            Error::MalformedResponse("no user entry in subgraph response".to_string())
        })?;

        let mut total = U256::ZERO;
        for entry in &user.stakes {
            let amount = U256::from_str_radix(&entry.stake, 10).map_err(|_| {
                Error::MalformedResponse(format!("unparseable stake amount: {:?}", entry.stake))
            })?;
            total = total.checked_add(amount).ok_or_else(|| {
                Error::MalformedResponse("stake amounts overflow 256 bits".to_string())
            })?;
        }
        Ok(total)
    }
}

#[async_trait]
impl Provider for SelfStakingProvider {
    fn id(&self) -> ProviderId {
        self.tier.provider_id()
    }

    async fn verify(&self, request: &VerifyRequest) -> Result<VerifiedPayload> {
        let id = self.id();

        let address = parse_address(&request.address).map_err(|e| Error::external(id, e))?;
        let address_lower = to_lowercase_hex(&address);
        let round = request.round.as_deref().unwrap_or(DEFAULT_ROUND);

        let body = self
            .subgraph
            .query(&stake_query(&address_lower, round))
            .await
            .map_err(|e| Error::external(id, e))?;

        let response: StakeResponse =
            serde_json::from_value(body).map_err(|e| Error::external(id, e))?;

        let staked = self
            .staked_amount(&response)
            .map_err(|e| Error::external(id, e))?;

        if staked >= self.tier.threshold() {
            let mut record = Evidence::new();
            record.insert("address".to_string(), address_lower);
            record.insert(
                "stakeAmount".to_string(),
                self.tier.evidence_tag().to_string(),
            );
            Ok(VerifiedPayload::passing(record))
        } else {
            Ok(VerifiedPayload::failing(vec![format!(
                "Your current staking amount is {staked}, \
                 which is below the requirement for this stamp."
            )]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds_in_base_units() {
        assert_eq!(
            StakingTier::Bronze.threshold(),
            U256::from_str_radix("5000000000000000000", 10).unwrap()
        );
        assert_eq!(
            StakingTier::Silver.threshold(),
            U256::from_str_radix("20000000000000000000", 10).unwrap()
        );
        assert_eq!(
            StakingTier::Gold.threshold(),
            U256::from_str_radix("125000000000000000000", 10).unwrap()
        );
    }

    #[test]
    fn test_tier_tags_and_ids() {
        assert_eq!(StakingTier::Bronze.evidence_tag(), "ssgte5");
        assert_eq!(StakingTier::Silver.evidence_tag(), "ssgte20");
        assert_eq!(StakingTier::Gold.evidence_tag(), "ssgte125");
        assert_eq!(
            StakingTier::Gold.provider_id(),
            ProviderId::SelfStakingGold
        );
    }

    #[test]
    fn test_stake_query_embeds_address_and_round() {
        let query = stake_query("0xabc", "7");
        assert!(query.contains("address: \"0xabc\""));
        assert!(query.contains("round: \"7\""));
        assert!(query.contains("stakes"));
        assert!(query.contains("xstakeAggregates"));
    }

    #[test]
    fn test_response_shape_parses() {
        let body = serde_json::json!({
            "data": {
                "users": [
                    {
                        "stakes": [{ "stake": "220000000000000000000" }],
                        "xstakeAggregates": []
                    }
                ]
            }
        });
        let parsed: StakeResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.data.users[0].stakes[0].stake, "220000000000000000000");
    }

    #[test]
    fn test_missing_stakes_field_is_an_error() {
        // Mirrors a destructuring failure on `users: [{}]`
        let body = serde_json::json!({ "data": { "users": [{}] } });
        assert!(serde_json::from_value::<StakeResponse>(body).is_err());
    }

    struct NullSubgraph;

    #[async_trait]
    impl SubgraphClient for NullSubgraph {
        async fn query(&self, _query: &str) -> Result<Value> {
            Err(Error::Transport("no subgraph in unit tests".to_string()))
        }
    }

    #[test]
    fn test_stake_sum_overflow_is_malformed_not_a_panic() {
        // Hostile subgraph data: two max-value stakes would wrap a u256 sum
        let provider = SelfStakingProvider::bronze(Arc::new(NullSubgraph));
        let max = U256::MAX.to_string();
        let body = serde_json::json!({
            "data": { "users": [ { "stakes": [ { "stake": max }, { "stake": "1" } ] } ] }
        });
        let response: StakeResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(
            provider.staked_amount(&response),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_amounts_beyond_u64_compare_correctly() {
        // 10^21 does not fit in u64
        let big = U256::from_str_radix("1000000000000000000000", 10).unwrap();
        assert!(big >= StakingTier::Gold.threshold());
        let small = U256::from_str_radix("124999999999999999999", 10).unwrap();
        assert!(small < StakingTier::Gold.threshold());
    }
}
