// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyward password manager.

use thiserror::Error;

/// Failures of the credential cipher.
///
/// Display strings are deliberately generic: they never carry key material,
/// plaintext, or the primitive-level reason a decryption failed. Wrong-key and
/// corrupted-data failures both surface as [`CipherError::Decryption`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Secret key material is absent or empty.
    #[error("cipher is not configured: {0}")]
    Configuration(String),

    /// The stored value is not an `<ivHex>:<cipherHex>` token.
    #[error("malformed ciphertext token")]
    MalformedToken,

    /// The token parsed but could not be decrypted, unpadded, or decoded.
    #[error("failed to decrypt data")]
    Decryption,

    /// The underlying primitive failed while encrypting.
    #[error("failed to encrypt data")]
    Encryption,
}

/// The primary error type used across Keyward crates.
#[derive(Debug, Error)]
pub enum KeywardError {
    /// Configuration errors (invalid TOML, missing required values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Credential cipher errors.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Caller-supplied input was rejected.
    #[error("{0}")]
    Validation(String),

    /// The caller is not authenticated or presented bad credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The write would violate a uniqueness rule.
    #[error("{0}")]
    Conflict(String),

    /// Upstream chat provider errors (HTTP failure, bad response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeywardError {
    /// True for errors whose detail must never reach an HTTP client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            KeywardError::Config(_)
                | KeywardError::Storage { .. }
                | KeywardError::Cipher(_)
                | KeywardError::Provider { .. }
                | KeywardError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cipher_messages_carry_no_detail() {
        assert_eq!(CipherError::Decryption.to_string(), "failed to decrypt data");
        assert_eq!(CipherError::Encryption.to_string(), "failed to encrypt data");
        assert_eq!(
            CipherError::MalformedToken.to_string(),
            "malformed ciphertext token"
        );
    }

    #[test]
    fn cipher_error_converts_and_is_internal() {
        let err: KeywardError = CipherError::MalformedToken.into();
        assert!(matches!(err, KeywardError::Cipher(CipherError::MalformedToken)));
        assert!(err.is_internal());
    }

    #[test]
    fn caller_errors_are_not_internal() {
        assert!(!KeywardError::Validation("x".into()).is_internal());
        assert!(!KeywardError::Unauthorized("x".into()).is_internal());
        assert!(!KeywardError::NotFound("x".into()).is_internal());
        assert!(!KeywardError::Conflict("x".into()).is_internal());
        assert!(
            KeywardError::Storage {
                source: "disk".into()
            }
            .is_internal()
        );
    }
}
