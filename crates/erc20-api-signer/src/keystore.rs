//! Encrypted keystore unlocking.
//!
//! Reads Ethereum V3 keystore files (scrypt or pbkdf2, aes-128-ctr) through
//! alloy's local signer.

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;

use crate::signer::SignerError;

/// Decrypts the keystore at `path` with `password`.
pub fn unlock(path: &Path, password: &str) -> Result<PrivateKeySigner, SignerError> {
    if !path.is_file() {
        return Err(SignerError::KeystoreNotFound(path.to_path_buf()));
    }
    PrivateKeySigner::decrypt_keystore(path, password)
        .map_err(|e| SignerError::Keystore(e.to_string()))
}

/// Asks for the keystore password on the terminal.
pub fn prompt_password(path: &Path) -> Result<String, SignerError> {
    let prompt = format!("Password for {}: ", path.display());
    rpassword::prompt_password(prompt).map_err(SignerError::Io)
}
