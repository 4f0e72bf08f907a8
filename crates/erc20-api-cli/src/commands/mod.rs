//! CLI subcommand implementations.

use std::path::PathBuf;

use erc20_api_core::Config;
use erc20_api_evm::{Deployment, DeploymentError, EvmAdapter};
use tracing::{info, warn};

pub mod query;
pub mod serve;

/// Loads the config file (if any) with environment overrides applied.
pub(crate) fn load_config(
    config_path: Option<PathBuf>,
) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(path) = &config_path {
        info!("loading config from {}", path.display());
    }
    Ok(Config::load(config_path.as_deref())?)
}

/// Loads the deployment record named by `config`.
pub(crate) fn load_deployment(config: &Config) -> Result<Deployment, Box<dyn std::error::Error>> {
    let deployment = Deployment::load(&config.deployment_path)?;
    info!(
        address = %deployment.address,
        contract = deployment.contract.as_deref().unwrap_or("unknown"),
        "loaded deployment record"
    );

    let missing = deployment.missing_functions();
    if !missing.is_empty() {
        warn!("deployment ABI lacks functions: {}", missing.join(", "));
    }
    Ok(deployment)
}

/// Fails when the node serves a different chain than the deployment record.
///
/// An unreachable node is only logged; requests report the RPC error later.
pub(crate) async fn verify_chain(
    rpc_url: &str,
    deployment: &Deployment,
) -> Result<(), Box<dyn std::error::Error>> {
    let adapter = EvmAdapter::new(rpc_url)?;
    check_node_chain(&adapter, deployment).await?;
    Ok(())
}

async fn check_node_chain(
    adapter: &EvmAdapter,
    deployment: &Deployment,
) -> Result<(), DeploymentError> {
    match adapter.get_chain_id().await {
        Ok(chain_id) => {
            deployment.check_chain_id(chain_id)?;
            info!(chain_id, rpc_url = adapter.rpc_url(), "RPC node reachable");
        }
        Err(e) => warn!(rpc_url = adapter.rpc_url(), "could not read chain ID: {e}"),
    }
    Ok(())
}
