// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! scrypt key derivation from the process secret.
//!
//! The salt is a fixed literal, so the same secret always yields the same
//! 32-byte key. Tokens written by earlier deployments depend on this.

use keyward_config::model::CipherConfig;
use keyward_core::CipherError;
use zeroize::Zeroizing;

/// Salt shared by every derivation.
pub const KDF_SALT: &[u8] = b"salt";

/// Length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost `N`.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl From<&CipherConfig> for KdfParams {
    fn from(config: &CipherConfig) -> Self {
        Self {
            log_n: config.kdf_log_n,
            r: config.kdf_r,
            p: config.kdf_p,
        }
    }
}

/// Derive the 32-byte cipher key from secret key material.
///
/// The returned key is wrapped in [`Zeroizing`] and wiped on drop.
pub fn derive_key(secret: &[u8], params: KdfParams) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|e| CipherError::Configuration(format!("invalid scrypt parameters: {e}")))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(secret, KDF_SALT, &scrypt_params, key.as_mut())
        .map_err(|_| CipherError::Encryption)?;

    Ok(key)
}
