//! Signing key resolution.
//!
//! `PRIVATE_KEY` wins over a keystore. With neither configured the gateway
//! runs read-only.

use std::path::{Path, PathBuf};

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;
use tracing::debug;

use crate::keystore;

/// Errors arising from loading the signing key.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("PRIVATE_KEY must start with 0x")]
    MissingPrefix,

    #[error("PRIVATE_KEY must be 32 bytes of hex")]
    InvalidHex,

    #[error("PRIVATE_KEY is not a valid secp256k1 key: {0}")]
    InvalidKey(String),

    #[error("keystore not found at {}", .0.display())]
    KeystoreNotFound(PathBuf),

    #[error("keystore crypto error: {0}")]
    Keystore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the signing key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A 0x-prefixed hex private key.
    PrivateKey(String),
    /// A V3 keystore. Without a password one is prompted for.
    Keystore {
        path: PathBuf,
        password: Option<String>,
    },
}

impl KeySource {
    /// Picks a source from the configured values. Empty strings count as unset.
    pub fn resolve(
        private_key: Option<String>,
        keystore_path: Option<&Path>,
        password: Option<String>,
    ) -> Option<Self> {
        if let Some(key) = private_key.filter(|k| !k.trim().is_empty()) {
            return Some(Self::PrivateKey(key));
        }
        keystore_path.map(|path| Self::Keystore {
            path: path.to_path_buf(),
            password: password.filter(|p| !p.is_empty()),
        })
    }
}

/// Parses a 0x-prefixed 32-byte hex private key.
pub fn parse_private_key(value: &str) -> Result<PrivateKeySigner, SignerError> {
    let hex = value
        .trim()
        .strip_prefix("0x")
        .ok_or(SignerError::MissingPrefix)?;
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SignerError::InvalidHex);
    }
    let bytes: B256 = hex.parse().map_err(|_| SignerError::InvalidHex)?;
    PrivateKeySigner::from_bytes(&bytes).map_err(|e| SignerError::InvalidKey(e.to_string()))
}

/// Loads the signer for `source`, or `None` when no key is configured.
pub fn load_signer(source: Option<KeySource>) -> Result<Option<PrivateKeySigner>, SignerError> {
    let signer = match source {
        None => return Ok(None),
        Some(KeySource::PrivateKey(key)) => parse_private_key(&key)?,
        Some(KeySource::Keystore { path, password }) => {
            if !path.is_file() {
                return Err(SignerError::KeystoreNotFound(path));
            }
            let password = match password {
                Some(p) => p,
                None => keystore::prompt_password(&path)?,
            };
            keystore::unlock(&path, &password)?
        }
    };
    debug!(address = %signer.address(), "signing key loaded");
    Ok(Some(signer))
}
