//! # erc20-api-signer
//!
//! Loads the gateway's signing key from a hex private key or an encrypted
//! V3 keystore.

pub mod keystore;
pub mod signer;

pub use signer::{load_signer, parse_private_key, KeySource, SignerError};
