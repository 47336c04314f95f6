// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret key material, the root of trust for every credential token.

use std::fmt;

use keyward_core::CipherError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable read when no other name is configured.
pub const DEFAULT_SECRET_KEY_ENV: &str = "SECRET_KEY_ENCRYPT";

/// The process-wide secret the cipher key is derived from.
///
/// Never empty. `Debug` output is redacted.
pub struct SecretKeyMaterial(SecretString);

impl SecretKeyMaterial {
    /// Wrap a secret value, rejecting the empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, CipherError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CipherError::Configuration(
                "secret key material is empty".to_string(),
            ));
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Read the secret from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, CipherError> {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => Ok(Self(SecretString::from(value))),
            Ok(_) => Err(CipherError::Configuration(format!(
                "environment variable `{var}` is empty"
            ))),
            Err(_) => Err(CipherError::Configuration(format!(
                "environment variable `{var}` is not set"
            ))),
        }
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKeyMaterial([REDACTED])")
    }
}
