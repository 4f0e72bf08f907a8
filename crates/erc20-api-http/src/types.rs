//! Request bodies for the write endpoints.
//!
//! Fields are kept as raw JSON values: anything missing or mistyped is
//! reported by the token service's own validation, not by the extractor.

use serde::Deserialize;
use serde_json::Value;

use erc20_api_evm::Amount;

/// `POST /api/approve`
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub spender: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

/// `POST /api/transferFrom`
#[derive(Debug, Default, Deserialize)]
pub struct TransferFromRequest {
    #[serde(default)]
    pub from: Option<Value>,
    #[serde(default)]
    pub to: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

/// `POST /api/transfer` and `POST /api/mint`
#[derive(Debug, Default, Deserialize)]
pub struct RecipientRequest {
    #[serde(default)]
    pub to: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

/// Text of an address-like field. Missing and `null` become `""`.
pub fn field_text(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// An amount field as the service expects it.
pub fn field_amount(value: &Option<Value>) -> Amount {
    value
        .as_ref()
        .map(Amount::from_json)
        .unwrap_or_else(|| Amount::from(""))
}
