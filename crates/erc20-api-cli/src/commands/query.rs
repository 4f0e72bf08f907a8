//! `erc20-api token` and `erc20-api balance`: one-shot reads printed as JSON.

use std::path::PathBuf;

use erc20_api_evm::TokenService;

use super::{load_config, load_deployment, verify_chain};

async fn read_only_service(
    config_path: Option<PathBuf>,
) -> Result<TokenService, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let deployment = load_deployment(&config)?;
    verify_chain(&config.rpc_url, &deployment).await?;
    Ok(TokenService::connect(&config.rpc_url, &deployment, None)?)
}

/// Run the `token` subcommand.
pub async fn token(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let service = read_only_service(config_path).await?;
    let info = service.token_info().await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Run the `balance` subcommand.
pub async fn balance(
    address: String,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = read_only_service(config_path).await?;
    let info = service.balance(&address).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
