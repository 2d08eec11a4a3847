//! Stamp verification CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use stamp_client::{CheckClient, StampAggregator, StampConfig};
use stamp_providers::{
    EnsProvider, HttpSubgraph, JsonRpcClient, Provider, RpcNameResolver, SelfStakingProvider,
    StakingTier,
};
use stamp_types::{ProviderId, VerifyRequest};

#[derive(Parser)]
#[command(name = "stamp")]
#[command(about = "Identity stamp verification client", long_about = None)]
struct Cli {
    /// Path to the endpoint configuration file
    #[arg(short, long, default_value = "stamp.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single provider check against an address
    Verify {
        /// Address to verify
        address: String,

        /// Provider type (Ens, SelfStakingBronze, SelfStakingSilver, SelfStakingGold)
        #[arg(short, long)]
        provider: String,

        /// Staking round (staking providers only)
        #[arg(long)]
        round: Option<String>,

        /// Node endpoint override for this request (chain-state providers)
        #[arg(long)]
        rpc_url: Option<String>,
    },

    /// Aggregate which platforms currently validate for an address
    Check {
        /// Address to check
        address: String,

        /// Provider types the identity already holds (repeatable)
        #[arg(long = "held")]
        held: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        StampConfig::from_file(&cli.config).map_err(|e| anyhow::anyhow!(e.to_string()))?
    } else {
        StampConfig::default()
    };

    let timeout = Duration::from_secs(config.timeout_secs);

    match cli.command {
        Commands::Verify {
            address,
            provider,
            round,
            rpc_url,
        } => {
            let id: ProviderId = provider
                .parse()
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            let mut request = VerifyRequest::new(address);
            if let Some(round) = round {
                request = request.with_round(round);
            }
            if let Some(rpc_url) = rpc_url {
                request = request.with_rpc_url(rpc_url);
            }

            let payload = build_provider(id, &config, timeout)?.verify(&request).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);

            if !payload.valid {
                std::process::exit(1);
            }
        }

        Commands::Check { address, held } => {
            let held: Vec<ProviderId> = held
                .iter()
                .map(|s| s.parse().map_err(|e| anyhow::anyhow!("{}", e)))
                .collect::<Result<_>>()?;

            let check = CheckClient::with_timeout(
                &config.verifier.base_url,
                &config.verifier.version,
                timeout,
            )?;
            let platforms = StampAggregator::new(check)
                .possible_stamps(&address, &held)
                .await;

            if platforms.is_empty() {
                println!("No platforms currently validate for {}", address);
            }
            for platform in platforms {
                println!("{}", platform.name);
                for group in platform.groups {
                    println!("  {}", group.name);
                    for provider in group.providers {
                        println!("    {} ({})", provider.title, provider.id);
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_provider(
    id: ProviderId,
    config: &StampConfig,
    timeout: Duration,
) -> Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = match id {
        ProviderId::Ens => {
            let rpc = JsonRpcClient::with_timeout(&config.rpc_url, timeout)?;
            Box::new(EnsProvider::new(RpcNameResolver::with_client(rpc)))
        }
        ProviderId::SelfStakingBronze => staking_provider(StakingTier::Bronze, config, timeout)?,
        ProviderId::SelfStakingSilver => staking_provider(StakingTier::Silver, config, timeout)?,
        ProviderId::SelfStakingGold => staking_provider(StakingTier::Gold, config, timeout)?,
    };
    Ok(provider)
}

fn staking_provider(
    tier: StakingTier,
    config: &StampConfig,
    timeout: Duration,
) -> Result<Box<dyn Provider>> {
    let subgraph = Arc::new(HttpSubgraph::with_timeout(&config.subgraph_url, timeout)?);
    Ok(Box::new(SelfStakingProvider::new(tier, subgraph)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_covers_every_id() {
        let config = StampConfig::default();
        let timeout = Duration::from_secs(config.timeout_secs);
        for &id in ProviderId::ALL {
            let provider = build_provider(id, &config, timeout).unwrap();
            assert_eq!(provider.id(), id);
        }
    }
}
