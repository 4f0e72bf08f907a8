//! # erc20-api-evm
//!
//! Access to a single deployed ERC-20 contract.
//!
//! ## Modules
//!
//! - [`abi`]: ERC-20 ABI definitions using alloy's `sol!` macro
//! - [`adapter`]: JSON-RPC adapter and the contract read client
//! - [`token`]: signed contract writes
//! - [`deployment`]: loader for the `{address, abi}` deployment record
//! - [`address`]: address validation and EIP-55 normalization
//! - [`units`]: decimal amount parsing and formatting
//! - [`service`]: the token service used by the HTTP layer

pub mod abi;
pub mod address;
pub mod adapter;
pub mod deployment;
pub mod service;
pub mod token;
pub mod types;
pub mod units;

// Re-export key types for convenience.
pub use adapter::{Erc20Reader, EvmAdapter, EvmAdapterError};
pub use deployment::{Deployment, DeploymentError};
pub use service::{
    ServiceError, TokenReader, TokenService, TokenWriter, TxOutcome, WriteAccess,
};
pub use token::Erc20Writer;
pub use types::{AllowanceInfo, BalanceInfo, TokenInfo, TxResult};
pub use units::Amount;

// Re-export alloy primitives used in the public API.
pub use alloy::primitives::{Address, B256, U256};
pub use alloy::signers::local::PrivateKeySigner;
