//! Chain adapter implementation.
//!
//! Connects to an EVM-compatible JSON-RPC endpoint and provides the read
//! side of the token contract.

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use thiserror::Error;

use crate::abi::IERC20;
use crate::service::TokenReader;

/// Errors from EVM adapter operations.
#[derive(Debug, Error)]
pub enum EvmAdapterError {
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("URL parse error: {0}")]
    UrlParse(String),
    #[error("ABI decode error: {0}")]
    AbiDecode(String),
}

/// Result alias for adapter operations.
pub type Result<T> = std::result::Result<T, EvmAdapterError>;

/// An EVM chain adapter connected to a specific RPC endpoint.
///
/// Built either read-only ([`EvmAdapter::new`]) or with a wallet filler that
/// signs and fills nonce, gas and fees ([`EvmAdapter::with_signer`]).
#[derive(Clone)]
pub struct EvmAdapter {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
}

impl std::fmt::Debug for EvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

fn parse_url(rpc_url: &str) -> Result<alloy::transports::http::reqwest::Url> {
    rpc_url
        .parse()
        .map_err(|e| EvmAdapterError::UrlParse(format!("{e}")))
}

impl EvmAdapter {
    /// Creates a read-only adapter for the given RPC URL.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Creates an adapter whose provider signs transactions with `signer`.
    pub fn with_signer(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    /// Returns the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Executes a read-only contract call and decodes its return value.
    pub async fn call<C: SolCall>(&self, contract: Address, call: C) -> Result<C::Return> {
        let data = call.abi_encode();

        let result: Bytes = self
            .provider
            .call(
                TransactionRequest::default()
                    .to(contract)
                    .input(data.into()),
            )
            .await
            .map_err(|e| EvmAdapterError::Rpc(e.to_string()))?;

        C::abi_decode_returns(&result).map_err(|e| EvmAdapterError::AbiDecode(e.to_string()))
    }

    /// Gets the chain ID from the connected node.
    pub async fn get_chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| EvmAdapterError::Rpc(e.to_string()))
    }
}

/// Read client for one deployed ERC-20 contract.
#[derive(Debug, Clone)]
pub struct Erc20Reader {
    adapter: EvmAdapter,
    token: Address,
}

impl Erc20Reader {
    pub fn new(adapter: EvmAdapter, token: Address) -> Self {
        Self { adapter, token }
    }
}

#[async_trait]
impl TokenReader for Erc20Reader {
    async fn name(&self) -> Result<String> {
        self.adapter.call(self.token, IERC20::nameCall {}).await
    }

    async fn symbol(&self) -> Result<String> {
        self.adapter.call(self.token, IERC20::symbolCall {}).await
    }

    async fn decimals(&self) -> Result<u8> {
        self.adapter.call(self.token, IERC20::decimalsCall {}).await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.adapter.call(self.token, IERC20::totalSupplyCall {}).await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.adapter
            .call(self.token, IERC20::balanceOfCall { owner })
            .await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.adapter
            .call(self.token, IERC20::allowanceCall { owner, spender })
            .await
    }
}
