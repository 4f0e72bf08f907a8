//! `erc20-api serve`: start the HTTP API.
//!
//! Loads config and the deployment record, resolves the signing key, then
//! serves until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;

use erc20_api_core::audit::AuditLogger;
use erc20_api_core::Config;
use erc20_api_evm::{PrivateKeySigner, TokenService};
use erc20_api_http::{AppState, HttpServer, ServerConfig};
use erc20_api_signer::{load_signer, KeySource};
use tracing::{info, warn};

use super::{load_config, load_deployment, verify_chain};

/// Resolves the signing key. An unusable key leaves the server read-only.
fn resolve_signer(config: &Config) -> Option<PrivateKeySigner> {
    let source = KeySource::resolve(
        std::env::var("PRIVATE_KEY").ok(),
        config.keystore_path.as_deref(),
        std::env::var("KEYSTORE_PASSWORD").ok(),
    );

    match load_signer(source) {
        Ok(Some(signer)) => {
            info!(address = %signer.address(), "server wallet loaded");
            Some(signer)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("ignoring signing key: {e}; write endpoints are disabled");
            None
        }
    }
}

/// Opens the configured audit log, if any.
fn open_audit_log(config: &Config) -> Result<Option<AuditLogger>, Box<dyn std::error::Error>> {
    let Some(path) = &config.audit_log_path else {
        return Ok(None);
    };
    let logger = AuditLogger::new(path)?;
    info!("audit log at {}", logger.path().display());
    Ok(Some(logger))
}

/// Run the `serve` subcommand.
pub async fn run(
    config_path: Option<PathBuf>,
    addr: Option<SocketAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(addr) = addr {
        config.listen_addr = addr;
    }

    let deployment = load_deployment(&config)?;
    verify_chain(&config.rpc_url, &deployment).await?;
    let signer = resolve_signer(&config);
    let service = TokenService::connect(&config.rpc_url, &deployment, signer)?;
    info!(rpc_url = %config.rpc_url, "connected token service");

    let mut state = AppState::new(service);
    if let Some(logger) = open_audit_log(&config)? {
        state = state.with_audit(logger);
    }

    let server_config = ServerConfig {
        listen_addr: config.listen_addr,
    };
    println!("ERC-20 API listening on http://{}", server_config.listen_addr);

    HttpServer::start(&server_config, state).await
}
