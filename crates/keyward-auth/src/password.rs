// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id hashing of account login passwords.
//!
//! Account passwords are verified, never revealed, so they are hashed here
//! rather than passed through the credential cipher.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &SecretString) -> Result<String, KeywardError> {
    let mut salt_bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt_bytes)
        .map_err(|_| KeywardError::Internal("failed to generate password salt".to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| KeywardError::Internal(format!("failed to encode password salt: {e}")))?;

    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| KeywardError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// An unparseable hash is an internal error, a mismatch is `Ok(false)`.
pub fn verify_password(password: &SecretString, phc: &str) -> Result<bool, KeywardError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| KeywardError::Internal(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_async(password: SecretString) -> Result<String, KeywardError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| KeywardError::Internal(format!("password hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_async(
    password: SecretString,
    phc: String,
) -> Result<bool, KeywardError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .map_err(|e| KeywardError::Internal(format!("password verification task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn hash_is_argon2id_phc() {
        let hash = hash_password(&secret("correct horse")).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
    }

    #[test]
    fn verify_accepts_right_and_rejects_wrong() {
        let hash = hash_password(&secret("correct horse")).unwrap();
        assert!(verify_password(&secret("correct horse"), &hash).unwrap());
        assert!(!verify_password(&secret("battery staple"), &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password(&secret("same")).unwrap();
        let b = hash_password(&secret("same")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_internal_error() {
        let err = verify_password(&secret("x"), "not-a-phc-string").unwrap_err();
        assert!(err.is_internal());
    }
}
