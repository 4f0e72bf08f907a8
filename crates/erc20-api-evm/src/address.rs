//! Address validation and EIP-55 normalization.

use alloy::primitives::Address;
use thiserror::Error;

/// Why an address string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is required")]
    Missing,
    #[error("must be 0x-prefixed followed by 40 hex characters")]
    Format,
    #[error("bad address checksum")]
    Checksum,
}

/// Validate that a string is a well-formed hex address (0x + 40 hex chars).
fn validate_hex_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses an address string.
///
/// All-lowercase and all-uppercase hex bodies are accepted without a checksum
/// check; mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, AddressError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AddressError::Missing);
    }
    if !validate_hex_address(value) {
        return Err(AddressError::Format);
    }

    let body = &value[2..];
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(value, None).map_err(|_| AddressError::Checksum)
    } else {
        value.parse().map_err(|_| AddressError::Format)
    }
}

/// Returns the EIP-55 checksummed form of an address.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}
