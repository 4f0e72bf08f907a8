//! Deployment record loader.
//!
//! The deploy script persists the contract address and ABI as JSON:
//!
//! ```json
//! {"contract":"MyToken","address":"0x5FbD...","chainId":31337,"abi":[...]}
//! ```

use std::path::{Path, PathBuf};

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use serde::Deserialize;
use thiserror::Error;

use crate::address::parse_address;

/// Functions the gateway calls on the deployed contract.
pub const REQUIRED_FUNCTIONS: [&str; 10] = [
    "name",
    "symbol",
    "decimals",
    "totalSupply",
    "balanceOf",
    "allowance",
    "approve",
    "transfer",
    "transferFrom",
    "mint",
];

/// Errors from loading the deployment record.
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("deployment info not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid contract address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
    #[error("deployment is for chain {recorded} but the RPC node reports chain {actual}")]
    ChainMismatch { recorded: u64, actual: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRecord {
    address: String,
    abi: JsonAbi,
    #[serde(default)]
    contract: Option<String>,
    #[serde(default)]
    chain_id: Option<u64>,
}

/// A deployed token contract.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Contract address.
    pub address: Address,
    /// Contract ABI as produced by the compiler.
    pub abi: JsonAbi,
    /// Contract name, when recorded.
    pub contract: Option<String>,
    /// Chain the contract was deployed to, when recorded.
    pub chain_id: Option<u64>,
}

impl Deployment {
    /// Loads the deployment record from `path`.
    pub fn load(path: &Path) -> Result<Self, DeploymentError> {
        if !path.exists() {
            return Err(DeploymentError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses a deployment record from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DeploymentError> {
        let record: DeploymentRecord = serde_json::from_str(json)?;
        let address =
            parse_address(&record.address).map_err(|e| DeploymentError::InvalidAddress {
                value: record.address.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            address,
            abi: record.abi,
            contract: record.contract,
            chain_id: record.chain_id,
        })
    }

    /// Checks the node's chain ID against the recorded one, if any.
    pub fn check_chain_id(&self, actual: u64) -> Result<(), DeploymentError> {
        match self.chain_id {
            Some(recorded) if recorded != actual => {
                Err(DeploymentError::ChainMismatch { recorded, actual })
            }
            _ => Ok(()),
        }
    }

    /// Names from [`REQUIRED_FUNCTIONS`] absent from the recorded ABI.
    pub fn missing_functions(&self) -> Vec<&'static str> {
        REQUIRED_FUNCTIONS
            .iter()
            .copied()
            .filter(|name| !self.abi.functions.contains_key(*name))
            .collect()
    }
}
