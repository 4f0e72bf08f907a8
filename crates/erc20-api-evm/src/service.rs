//! The token service.
//!
//! Validates addresses and amounts, converts amounts to base units using the
//! token's decimals (read once, then cached), and dispatches contract reads
//! and writes through the [`TokenReader`] / [`TokenWriter`] seams.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::adapter::{self, Erc20Reader, EvmAdapter, EvmAdapterError};
use crate::address::{parse_address, to_checksum};
use crate::deployment::Deployment;
use crate::token::Erc20Writer;
use crate::types::{AllowanceInfo, BalanceInfo, TokenInfo, TxResult};
use crate::units::{self, Amount};

/// Read side of the token contract.
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn name(&self) -> adapter::Result<String>;
    async fn symbol(&self) -> adapter::Result<String>;
    async fn decimals(&self) -> adapter::Result<u8>;
    async fn total_supply(&self) -> adapter::Result<U256>;
    async fn balance_of(&self, owner: Address) -> adapter::Result<U256>;
    async fn allowance(&self, owner: Address, spender: Address) -> adapter::Result<U256>;
}

/// Write side of the token contract. Each call returns once the receipt is mined.
#[async_trait]
pub trait TokenWriter: Send + Sync {
    async fn approve(&self, spender: Address, amount: U256) -> adapter::Result<TxOutcome>;
    async fn transfer(&self, to: Address, amount: U256) -> adapter::Result<TxOutcome>;
    async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> adapter::Result<TxOutcome>;
    async fn mint(&self, to: Address, amount: U256) -> adapter::Result<TxOutcome>;
}

/// A mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: B256,
    /// `false` when the transaction reverted.
    pub success: bool,
}

/// Whether this process can sign transactions.
#[derive(Clone)]
pub enum WriteAccess {
    /// No signing key configured; every write fails with [`ServiceError::Unconfigured`].
    ReadOnly,
    /// Writes are sent from `address`.
    Signer {
        address: Address,
        writer: Arc<dyn TokenWriter>,
    },
}

impl fmt::Debug for WriteAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("ReadOnly"),
            Self::Signer { address, .. } => {
                f.debug_struct("Signer").field("address", address).finish()
            }
        }
    }
}

/// Errors from token service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("server wallet not configured (set PRIVATE_KEY)")]
    Unconfigured,
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
    #[error(transparent)]
    Remote(#[from] EvmAdapterError),
}

impl ServiceError {
    /// `true` for errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }
}

fn checked_address(value: &str) -> Result<Address, ServiceError> {
    parse_address(value).map_err(|e| ServiceError::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn invalid_amount(value: &str, err: units::UnitsError) -> ServiceError {
    ServiceError::InvalidAmount {
        value: value.to_string(),
        reason: err.to_string(),
    }
}

/// Mediates every read and write against the deployed token.
pub struct TokenService {
    token: Address,
    reader: Arc<dyn TokenReader>,
    access: WriteAccess,
    decimals: OnceCell<u8>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("token", &self.token)
            .field("access", &self.access)
            .field("decimals", &self.decimals.get())
            .finish()
    }
}

impl TokenService {
    pub fn new(token: Address, reader: Arc<dyn TokenReader>, access: WriteAccess) -> Self {
        Self {
            token,
            reader,
            access,
            decimals: OnceCell::new(),
        }
    }

    /// Builds a service against a live node for the given deployment.
    ///
    /// With `signer` set, writes are enabled and sent from its address.
    pub fn connect(
        rpc_url: &str,
        deployment: &Deployment,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, EvmAdapterError> {
        let reader = Erc20Reader::new(EvmAdapter::new(rpc_url)?, deployment.address);

        let access = match signer {
            Some(signer) => {
                let writer = Erc20Writer::new(rpc_url, deployment.address, signer)?;
                WriteAccess::Signer {
                    address: writer.from_address(),
                    writer: Arc::new(writer),
                }
            }
            None => WriteAccess::ReadOnly,
        };

        Ok(Self::new(deployment.address, Arc::new(reader), access))
    }

    /// Seeds the decimals cache, skipping the first `decimals()` read.
    pub fn with_decimals(self, decimals: u8) -> Self {
        let _ = self.decimals.set(decimals);
        self
    }

    /// The token contract address.
    pub fn token_address(&self) -> Address {
        self.token
    }

    /// The configured write capability.
    pub fn access(&self) -> &WriteAccess {
        &self.access
    }

    /// The signer address, if writes are enabled.
    pub fn signer_address(&self) -> Option<Address> {
        match &self.access {
            WriteAccess::ReadOnly => None,
            WriteAccess::Signer { address, .. } => Some(*address),
        }
    }

    /// Token decimals, read from the contract on first use and cached after.
    pub async fn decimals(&self) -> Result<u8, ServiceError> {
        let decimals = self
            .decimals
            .get_or_try_init(|| async {
                let decimals = self.reader.decimals().await?;
                debug!(decimals, "cached token decimals");
                Ok::<_, EvmAdapterError>(decimals)
            })
            .await?;
        Ok(*decimals)
    }

    /// Name, symbol, decimals and supply, read concurrently.
    pub async fn token_info(&self) -> Result<TokenInfo, ServiceError> {
        let (name, symbol, decimals, total_supply) = tokio::try_join!(
            self.reader.name(),
            self.reader.symbol(),
            self.reader.decimals(),
            self.reader.total_supply(),
        )?;
        let _ = self.decimals.set(decimals);

        Ok(TokenInfo {
            address: to_checksum(&self.token),
            name,
            symbol,
            decimals,
            total_supply: total_supply.to_string(),
            total_supply_formatted: units::format_units(total_supply, decimals),
        })
    }

    /// Balance of `address`.
    pub async fn balance(&self, address: &str) -> Result<BalanceInfo, ServiceError> {
        let owner = checked_address(address)?;

        let (decimals, balance) = tokio::try_join!(self.decimals(), async {
            self.reader
                .balance_of(owner)
                .await
                .map_err(ServiceError::from)
        })?;

        Ok(BalanceInfo {
            address: to_checksum(&owner),
            balance: balance.to_string(),
            balance_formatted: units::format_units(balance, decimals),
        })
    }

    /// Amount `spender` may move on behalf of `owner`.
    pub async fn allowance(&self, owner: &str, spender: &str) -> Result<AllowanceInfo, ServiceError> {
        let owner = checked_address(owner)?;
        let spender = checked_address(spender)?;

        let (decimals, allowance) = tokio::try_join!(self.decimals(), async {
            self.reader
                .allowance(owner, spender)
                .await
                .map_err(ServiceError::from)
        })?;

        Ok(AllowanceInfo {
            owner: to_checksum(&owner),
            spender: to_checksum(&spender),
            allowance: allowance.to_string(),
            allowance_formatted: units::format_units(allowance, decimals),
        })
    }

    /// Approve `spender` to move `amount` from the signer's balance.
    pub async fn approve(&self, spender: &str, amount: &Amount) -> Result<TxResult, ServiceError> {
        let writer = self.writer()?;
        let spender = checked_address(spender)?;
        let value = self.base_units(amount).await?;

        info!(%spender, %value, "submitting approve");
        let outcome = writer.approve(spender, value).await?;
        Ok(report("approve", outcome))
    }

    /// Transfer `amount` from the signer to `to`.
    pub async fn transfer(&self, to: &str, amount: &Amount) -> Result<TxResult, ServiceError> {
        let writer = self.writer()?;
        let to = checked_address(to)?;
        let value = self.base_units(amount).await?;

        info!(%to, %value, "submitting transfer");
        let outcome = writer.transfer(to, value).await?;
        Ok(report("transfer", outcome))
    }

    /// Move `amount` from `from` to `to` using the signer's allowance.
    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        amount: &Amount,
    ) -> Result<TxResult, ServiceError> {
        let writer = self.writer()?;
        let from = checked_address(from)?;
        let to = checked_address(to)?;
        let value = self.base_units(amount).await?;

        info!(%from, %to, %value, "submitting transferFrom");
        let outcome = writer.transfer_from(from, to, value).await?;
        Ok(report("transferFrom", outcome))
    }

    /// Mint `amount` to `to`. The contract only accepts this from its owner.
    pub async fn mint(&self, to: &str, amount: &Amount) -> Result<TxResult, ServiceError> {
        let writer = self.writer()?;
        let to = checked_address(to)?;
        let value = self.base_units(amount).await?;

        info!(%to, %value, "submitting mint");
        let outcome = writer.mint(to, value).await?;
        Ok(report("mint", outcome))
    }

    fn writer(&self) -> Result<&dyn TokenWriter, ServiceError> {
        match &self.access {
            WriteAccess::ReadOnly => Err(ServiceError::Unconfigured),
            WriteAccess::Signer { writer, .. } => Ok(writer.as_ref()),
        }
    }

    /// Validates `amount` syntactically, then scales it by the token decimals.
    async fn base_units(&self, amount: &Amount) -> Result<U256, ServiceError> {
        let text = amount.as_text();
        units::validate_decimal(&text).map_err(|e| invalid_amount(&text, e))?;

        let decimals = self.decimals().await?;
        units::parse_units(&text, decimals).map_err(|e| invalid_amount(&text, e))
    }
}

fn report(operation: &str, outcome: TxOutcome) -> TxResult {
    if outcome.success {
        info!(operation, tx_hash = %outcome.hash, "transaction confirmed");
    } else {
        warn!(operation, tx_hash = %outcome.hash, "transaction mined but reverted (status=0)");
    }
    TxResult {
        hash: outcome.hash.to_string(),
        status: u8::from(outcome.success),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const HOLDER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[derive(Default)]
    struct StubReader {
        decimals: u8,
        supply: U256,
        balance: U256,
        fail: bool,
        decimals_calls: AtomicUsize,
        balance_calls: AtomicUsize,
    }

    impl StubReader {
        fn new(decimals: u8) -> Self {
            Self {
                decimals,
                ..Default::default()
            }
        }

        fn rpc(&self) -> adapter::Result<()> {
            if self.fail {
                Err(EvmAdapterError::Rpc("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TokenReader for StubReader {
        async fn name(&self) -> adapter::Result<String> {
            self.rpc()?;
            Ok("MyToken".into())
        }
        async fn symbol(&self) -> adapter::Result<String> {
            self.rpc()?;
            Ok("MTK".into())
        }
        async fn decimals(&self) -> adapter::Result<u8> {
            self.decimals_calls.fetch_add(1, Ordering::SeqCst);
            self.rpc()?;
            Ok(self.decimals)
        }
        async fn total_supply(&self) -> adapter::Result<U256> {
            self.rpc()?;
            Ok(self.supply)
        }
        async fn balance_of(&self, _owner: Address) -> adapter::Result<U256> {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            self.rpc()?;
            Ok(self.balance)
        }
        async fn allowance(&self, _owner: Address, _spender: Address) -> adapter::Result<U256> {
            self.rpc()?;
            Ok(U256::ZERO)
        }
    }

    #[derive(Default)]
    struct StubWriter {
        revert: bool,
        sent: Mutex<Vec<(&'static str, U256)>>,
    }

    impl StubWriter {
        fn record(&self, op: &'static str, amount: U256) -> adapter::Result<TxOutcome> {
            self.sent.lock().unwrap().push((op, amount));
            Ok(TxOutcome {
                hash: B256::with_last_byte(1),
                success: !self.revert,
            })
        }
    }

    #[async_trait]
    impl TokenWriter for StubWriter {
        async fn approve(&self, _spender: Address, amount: U256) -> adapter::Result<TxOutcome> {
            self.record("approve", amount)
        }
        async fn transfer(&self, _to: Address, amount: U256) -> adapter::Result<TxOutcome> {
            self.record("transfer", amount)
        }
        async fn transfer_from(
            &self,
            _from: Address,
            _to: Address,
            amount: U256,
        ) -> adapter::Result<TxOutcome> {
            self.record("transferFrom", amount)
        }
        async fn mint(&self, _to: Address, amount: U256) -> adapter::Result<TxOutcome> {
            self.record("mint", amount)
        }
    }

    fn token() -> Address {
        TOKEN.parse().unwrap()
    }

    fn read_only(reader: Arc<StubReader>) -> TokenService {
        TokenService::new(token(), reader, WriteAccess::ReadOnly)
    }

    fn signing(reader: Arc<StubReader>, writer: Arc<StubWriter>) -> TokenService {
        TokenService::new(
            token(),
            reader,
            WriteAccess::Signer {
                address: Address::with_last_byte(9),
                writer,
            },
        )
    }

    fn tokens(n: u64, decimals: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(decimals))
    }

    #[tokio::test]
    async fn token_info_formats_supply() {
        let reader = Arc::new(StubReader {
            supply: tokens(1_000_000, 18) + U256::from(5u64),
            ..StubReader::new(18)
        });
        let service = read_only(reader);

        let info = service.token_info().await.unwrap();
        assert_eq!(info.address, TOKEN);
        assert_eq!(info.name, "MyToken");
        assert_eq!(info.symbol, "MTK");
        assert_eq!(info.decimals, 18);
        assert_eq!(info.total_supply, "1000000000000000000000005");
        assert_eq!(info.total_supply_formatted, "1000000.000000000000000005");
    }

    #[tokio::test]
    async fn token_info_is_idempotent() {
        let service = read_only(Arc::new(StubReader::new(6)));
        let first = service.token_info().await.unwrap();
        let second = service.token_info().await.unwrap();
        assert_eq!(first.decimals, second.decimals);
        assert_eq!(first.address, second.address);
    }

    #[tokio::test]
    async fn token_info_remote_failure() {
        let reader = Arc::new(StubReader {
            fail: true,
            ..StubReader::new(18)
        });
        let err = read_only(reader).token_info().await.unwrap_err();
        assert!(matches!(err, ServiceError::Remote(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn token_info_seeds_decimals_cache() {
        let reader = Arc::new(StubReader::new(18));
        let service = read_only(Arc::clone(&reader));
        service.token_info().await.unwrap();
        service.balance(HOLDER).await.unwrap();
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn decimals_read_once() {
        let reader = Arc::new(StubReader::new(18));
        let service = read_only(Arc::clone(&reader));
        for _ in 0..3 {
            assert_eq!(service.decimals().await.unwrap(), 18);
        }
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_decimals_read_not_cached() {
        let failing = Arc::new(StubReader {
            fail: true,
            ..StubReader::new(18)
        });
        let service = read_only(Arc::clone(&failing));
        assert!(service.decimals().await.is_err());
        assert!(service.decimals().await.is_err());
        assert_eq!(failing.decimals_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn seeded_decimals_skip_chain_read() {
        let reader = Arc::new(StubReader::new(18));
        let service = read_only(Arc::clone(&reader)).with_decimals(6);
        assert_eq!(service.decimals().await.unwrap(), 6);
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn balance_normalizes_and_formats() {
        let reader = Arc::new(StubReader {
            balance: tokens(100, 18),
            ..StubReader::new(18)
        });
        let service = read_only(reader);

        let info = service.balance(&HOLDER.to_lowercase()).await.unwrap();
        assert_eq!(info.address, HOLDER);
        assert_eq!(info.balance, "100000000000000000000");
        assert_eq!(info.balance_formatted, "100.0");
    }

    #[tokio::test]
    async fn invalid_balance_address_skips_rpc() {
        let reader = Arc::new(StubReader::new(18));
        let service = read_only(Arc::clone(&reader));

        let err = service.balance("not-an-address").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAddress { .. }));
        assert_eq!(reader.balance_calls.load(Ordering::SeqCst), 0);
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn allowance_formats_both_addresses() {
        let service = read_only(Arc::new(StubReader::new(18)));
        let info = service.allowance(HOLDER, TOKEN).await.unwrap();
        assert_eq!(info.owner, HOLDER);
        assert_eq!(info.spender, TOKEN);
        assert_eq!(info.allowance_formatted, "0.0");
    }

    #[tokio::test]
    async fn read_only_write_fails_before_any_call() {
        let reader = Arc::new(StubReader::new(18));
        let service = read_only(Arc::clone(&reader));

        let err = service
            .transfer(HOLDER, &Amount::from("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unconfigured));
        assert!(err.to_string().contains("PRIVATE_KEY"));
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 0);

        for result in [
            service.approve(HOLDER, &Amount::from("1")).await,
            service.transfer_from(HOLDER, HOLDER, &Amount::from("1")).await,
            service.mint(HOLDER, &Amount::from("1")).await,
        ] {
            assert!(matches!(result, Err(ServiceError::Unconfigured)));
        }
    }

    #[tokio::test]
    async fn bad_amounts_never_reach_network() {
        let reader = Arc::new(StubReader::new(18));
        let writer = Arc::new(StubWriter::default());
        let service = signing(Arc::clone(&reader), Arc::clone(&writer));

        for bad in ["-5", "abc", "", "1e3"] {
            let err = service
                .transfer(HOLDER, &Amount::from(bad))
                .await
                .unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidAmount { .. }),
                "{bad}: {err}"
            );
        }
        assert_eq!(reader.decimals_calls.load(Ordering::SeqCst), 0);
        assert!(writer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_recipient_rejected() {
        let writer = Arc::new(StubWriter::default());
        let service = signing(Arc::new(StubReader::new(18)), Arc::clone(&writer));
        let err = service
            .mint("0x1234", &Amount::from("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAddress { .. }));
        assert!(err.is_validation());
        assert!(writer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn excess_precision_rejected() {
        let service = signing(
            Arc::new(StubReader::new(6)),
            Arc::new(StubWriter::default()),
        );
        let err = service
            .approve(HOLDER, &Amount::from("0.0000001"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("too many decimal places"));
    }

    #[tokio::test]
    async fn writes_convert_to_base_units() {
        let writer = Arc::new(StubWriter::default());
        let service = signing(Arc::new(StubReader::new(18)), Arc::clone(&writer));

        let result = service
            .transfer(HOLDER, &Amount::from("100"))
            .await
            .unwrap();
        assert_eq!(result.status, 1);
        assert!(result.hash.starts_with("0x"));

        service.approve(HOLDER, &Amount::from(2u64)).await.unwrap();
        service
            .transfer_from(HOLDER, TOKEN, &Amount::from("0.5"))
            .await
            .unwrap();
        service.mint(HOLDER, &Amount::from("42.0")).await.unwrap();

        let sent = writer.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                ("transfer", tokens(100, 18)),
                ("approve", tokens(2, 18)),
                ("transferFrom", tokens(5, 17)),
                ("mint", tokens(42, 18)),
            ]
        );
    }

    #[tokio::test]
    async fn reverted_receipt_is_reported_not_raised() {
        let writer = Arc::new(StubWriter {
            revert: true,
            ..Default::default()
        });
        let service = signing(Arc::new(StubReader::new(18)), writer);
        let result = service.transfer(HOLDER, &Amount::from("1")).await.unwrap();
        assert_eq!(result.status, 0);
    }

    #[test]
    fn signer_address_follows_access() {
        let reader: Arc<dyn TokenReader> = Arc::new(StubReader::new(18));
        let service = TokenService::new(token(), Arc::clone(&reader), WriteAccess::ReadOnly);
        assert!(service.signer_address().is_none());
        assert_eq!(format!("{:?}", service.access()), "ReadOnly");

        let service = TokenService::new(
            token(),
            reader,
            WriteAccess::Signer {
                address: Address::with_last_byte(9),
                writer: Arc::new(StubWriter::default()),
            },
        );
        assert_eq!(service.signer_address(), Some(Address::with_last_byte(9)));
        assert_eq!(service.token_address(), token());
    }

    #[test]
    fn token_address_displays_checksummed() {
        let service = read_only(Arc::new(StubReader::new(18)));
        assert_eq!(service.token_address().to_string(), TOKEN);
    }
}
