//! Signed ERC-20 writes: approve, transfer, transferFrom and mint.
//!
//! Nonce, gas and fee filling plus signing are done by the wallet-enabled
//! provider; each write blocks until its receipt is available.

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;

use crate::abi::IERC20;
use crate::adapter::{EvmAdapter, EvmAdapterError, Result};
use crate::service::{TokenWriter, TxOutcome};

/// Write client for one deployed ERC-20 contract, bound to a signer.
#[derive(Debug, Clone)]
pub struct Erc20Writer {
    adapter: EvmAdapter,
    token: Address,
    from: Address,
}

impl Erc20Writer {
    /// Creates a writer sending from `signer`'s address.
    pub fn new(rpc_url: &str, token: Address, signer: PrivateKeySigner) -> Result<Self> {
        let from = signer.address();
        let adapter = EvmAdapter::with_signer(rpc_url, signer)?;
        Ok(Self {
            adapter,
            token,
            from,
        })
    }

    /// The address transactions are sent from.
    pub fn from_address(&self) -> Address {
        self.from
    }

    /// Builds the transaction request for a contract call.
    fn build<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest::default()
            .from(self.from)
            .to(self.token)
            .input(call.abi_encode().into())
    }

    /// Submits a contract call and waits for its receipt.
    async fn submit<C: SolCall>(&self, call: C) -> Result<TxOutcome> {
        let tx = self.build(&call);

        let pending = self
            .adapter
            .provider()
            .send_transaction(tx)
            .await
            .map_err(|e| EvmAdapterError::Rpc(e.to_string()))?;
        debug!(tx_hash = %pending.tx_hash(), "transaction submitted, waiting for receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| EvmAdapterError::Rpc(e.to_string()))?;

        Ok(TxOutcome {
            hash: receipt.transaction_hash(),
            success: receipt.status(),
        })
    }
}

#[async_trait]
impl TokenWriter for Erc20Writer {
    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IERC20::approveCall { spender, amount }).await
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IERC20::transferCall { to, amount }).await
    }

    async fn transfer_from(&self, from: Address, to: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IERC20::transferFromCall { from, to, amount })
            .await
    }

    async fn mint(&self, to: Address, amount: U256) -> Result<TxOutcome> {
        self.submit(IERC20::mintCall { to, amount }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxKind;

    // Anvil account 0.
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn writer(token: Address) -> Erc20Writer {
        let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
        Erc20Writer::new("http://127.0.0.1:8545", token, signer).unwrap()
    }

    #[test]
    fn sends_from_signer_address() {
        let w = writer(Address::ZERO);
        assert_eq!(
            w.from_address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn build_transfer_targets_token_contract() {
        let token = Address::with_last_byte(0xaa);
        let w = writer(token);
        let tx = w.build(&IERC20::transferCall {
            to: Address::with_last_byte(1),
            amount: U256::from(1000u64),
        });

        // Sent TO the token contract, FROM the signer, with no ETH value.
        assert_eq!(tx.to, Some(TxKind::Call(token)));
        assert_eq!(tx.from, Some(w.from_address()));
        assert!(tx.value.is_none());
        let input = tx.input.input().unwrap();
        // transfer selector = 0xa9059cbb
        assert_eq!(&input[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(input.len(), 68);
    }

    #[test]
    fn build_mint_encodes_calldata() {
        let w = writer(Address::ZERO);
        let tx = w.build(&IERC20::mintCall {
            to: Address::with_last_byte(2),
            amount: U256::from(42u64),
        });
        let input = tx.input.input().unwrap();
        assert_eq!(&input[..4], &[0x40, 0xc1, 0x0f, 0x19]);
    }
}
