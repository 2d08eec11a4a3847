//! Stamp verification providers
//!
//! Each provider implements one stateless identity check: build request
//! parameters from the input payload, invoke an external data source
//! adapter (JSON-RPC node, subgraph indexer), interpret the result against
//! a fixed rule, and produce a verdict. Adapters sit behind traits so the
//! decision logic can be exercised without a network.

pub mod ens;
pub mod provider;
pub mod registry;
pub mod rpc;
pub mod staking;

pub use ens::{EnsProvider, NameResolver, RpcNameResolver};
pub use provider::Provider;
pub use registry::{platform, registered_provider_ids, GroupSpec, PlatformSpec, ProviderSpec, PLATFORMS};
pub use rpc::JsonRpcClient;
pub use staking::{HttpSubgraph, SelfStakingProvider, StakingTier, SubgraphClient};
