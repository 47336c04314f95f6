// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque session tokens.
//!
//! The cookie carries 32 random bytes as hex. The store only ever sees the
//! SHA-256 of that value, so a leaked database cannot be replayed as cookies.

use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// A session token freshly issued to a client.
pub struct IssuedSession {
    /// Cookie value. Shown to the client once, never stored.
    pub token: SecretString,
    pub expires_at: String,
    /// Lifetime in seconds, for the cookie `Max-Age`.
    pub max_age_secs: u64,
}

impl std::fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("max_age_secs", &self.max_age_secs)
            .finish()
    }
}

/// Generate a new random session token.
pub fn generate_token() -> Result<SecretString, KeywardError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| KeywardError::Internal("failed to generate session token".to_string()))?;
    Ok(SecretString::from(hex::encode(bytes)))
}

/// The storage key for a session token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash of an issued token, for storing alongside the session.
pub fn token_hash(token: &SecretString) -> String {
    hash_token(token.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();
        assert_eq!(a.expose_secret().len(), 64);
        assert!(a.expose_secret().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn issued_session_debug_redacts_token() {
        let issued = IssuedSession {
            token: SecretString::from("deadbeef".to_string()),
            expires_at: "2026-01-01T00:00:00.000Z".to_string(),
            max_age_secs: 60,
        };
        let out = format!("{issued:?}");
        assert!(!out.contains("deadbeef"));
        assert!(out.contains("[redacted]"));
    }
}
