//! Conversion between human-readable decimal amounts and base units.
//!
//! All arithmetic is exact: amounts are handled as digit strings and `U256`,
//! never as floating point.

use std::borrow::Cow;
use std::fmt;

use alloy::primitives::U256;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why an amount could not be converted to base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("amount is required")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("not a decimal number")]
    NotANumber,
    #[error("too many decimal places: got {got}, max {max}")]
    TooManyDecimals { got: usize, max: u8 },
    #[error("amount exceeds 256 bits")]
    Overflow,
}

/// An amount as supplied by a client: a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    /// Builds an amount from an arbitrary JSON value.
    ///
    /// Values that are neither strings nor numbers keep their JSON text and
    /// fail validation later.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => Self::Number(n.clone()),
            Value::Null => Self::Text(String::new()),
            other => Self::Text(other.to_string()),
        }
    }

    /// The amount as decimal text.
    ///
    /// JSON numbers that serde_json renders in exponent form (integers of
    /// 2^64 and above, tiny fractions) are expanded to plain digits.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.trim()),
            Self::Number(n) => {
                let text = n.to_string();
                Cow::Owned(expand_exponent(&text).unwrap_or(text))
            }
        }
    }
}

/// Rewrites `1e+20` or `-1.5e-7` as plain decimal text.
///
/// Returns `None` when `text` has no exponent or is not a well-formed number.
fn expand_exponent(text: &str) -> Option<String> {
    let (mantissa, exp) = text.split_once(|c| c == 'e' || c == 'E')?;
    let exp: i32 = exp.parse().ok()?;
    if exp.unsigned_abs() > 400 {
        return None;
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (integer, fractional) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{integer}{fractional}");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let point = integer.len() as i64 + i64::from(exp);
    let body = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (whole, frac) = digits.split_at(point as usize);
        format!("{whole}.{frac}")
    };
    Some(format!("{sign}{body}"))
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for Amount {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

/// Checks that `amount` is an unsigned decimal number (`123`, `1.5`, `.5`, `5.`).
///
/// Independent of the token's decimals, so it can run before any chain read.
pub fn validate_decimal(amount: &str) -> Result<(), UnitsError> {
    split_decimal(amount).map(|_| ())
}

fn split_decimal(amount: &str) -> Result<(&str, &str), UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }
    if amount.starts_with('-') {
        return Err(UnitsError::Negative);
    }

    let (integer, fractional) = amount.split_once('.').unwrap_or((amount, ""));
    if integer.is_empty() && fractional.is_empty() {
        return Err(UnitsError::NotANumber);
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fractional) {
        return Err(UnitsError::NotANumber);
    }
    Ok((integer, fractional))
}

/// Parse a decimal string (e.g. "1.5") into base units with the given decimals.
///
/// `parse_units("1.5", 18)` → `U256(1_500_000_000_000_000_000)`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let (integer, fractional) = split_decimal(amount)?;
    // Trailing zeros never carry precision: "1000.0" is valid with 0 decimals.
    let fractional = fractional.trim_end_matches('0');

    if fractional.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            got: fractional.len(),
            max: decimals,
        });
    }

    // Pad fractional part to `decimals` digits and combine into one integer.
    let combined = format!("{integer}{fractional:0<width$}", width = decimals as usize);
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(combined, 10).map_err(|_| UnitsError::Overflow)
}

/// Convert a base-unit value to a decimal string with the given decimals.
///
/// Trailing fractional zeros are trimmed, keeping at least one digit:
/// `format_units(100 * 10^18, 18)` → `"100.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };

    let (integer, fractional) = padded.split_at(padded.len() - decimals);
    let fractional = fractional.trim_end_matches('0');
    if fractional.is_empty() {
        format!("{integer}.0")
    } else {
        format!("{integer}.{fractional}")
    }
}
