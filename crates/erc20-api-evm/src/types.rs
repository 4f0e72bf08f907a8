//! Response snapshots returned by the token service.
//!
//! Base-unit values are base-10 strings so JSON clients never lose precision.

use serde::{Deserialize, Serialize};

/// Token metadata and supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Checksummed contract address.
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Total supply in base units.
    pub total_supply: String,
    /// Total supply scaled by `decimals`.
    pub total_supply_formatted: String,
}

/// A holder's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInfo {
    /// Checksummed holder address.
    pub address: String,
    /// Balance in base units.
    pub balance: String,
    pub balance_formatted: String,
}

/// An owner's allowance for a spender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceInfo {
    pub owner: String,
    pub spender: String,
    /// Allowance in base units.
    pub allowance: String,
    pub allowance_formatted: String,
}

/// Outcome of a mined write transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// 0x-prefixed transaction hash.
    pub hash: String,
    /// 1 if the transaction succeeded, 0 if it reverted.
    pub status: u8,
}
