// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-CBC encrypt/decrypt of single credential strings.
//!
//! Every call to [`CredentialCipher::encrypt`] draws a fresh 128-bit IV from the
//! system CSPRNG, so encrypting the same plaintext twice yields different
//! tokens. The key is re-derived on every call and never cached.

use std::fmt;
use std::sync::Arc;

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use keyward_config::model::CipherConfig;
use keyward_core::CipherError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::{KdfParams, derive_key};
use crate::secret::SecretKeyMaterial;
use crate::token::{CipherToken, IV_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_LEN: usize = 16;

/// Reversible transform between plaintext credentials and storage tokens.
///
/// Cloning is cheap; clones share the same secret.
#[derive(Clone)]
pub struct CredentialCipher {
    secret: Result<Arc<SecretKeyMaterial>, CipherError>,
    params: KdfParams,
}

impl CredentialCipher {
    /// Build a cipher over an explicit secret.
    pub fn new(secret: SecretKeyMaterial, params: KdfParams) -> Self {
        Self {
            secret: Ok(Arc::new(secret)),
            params,
        }
    }

    /// Build a cipher whose secret is read once from the environment variable `var`.
    ///
    /// A missing or empty variable does not fail construction. Instead every
    /// later `encrypt`/`decrypt` returns [`CipherError::Configuration`].
    pub fn from_env(var: &str, params: KdfParams) -> Self {
        let secret = SecretKeyMaterial::from_env(var).map(Arc::new);
        if let Err(e) = &secret {
            tracing::warn!(error = %e, "credential cipher has no secret key material");
        }
        Self { secret, params }
    }

    /// Build a cipher from the `[cipher]` configuration section.
    pub fn from_config(config: &CipherConfig) -> Self {
        Self::from_env(&config.secret_key_env, KdfParams::from(config))
    }

    /// True when secret key material was found.
    pub fn is_configured(&self) -> bool {
        self.secret.is_ok()
    }

    /// The KDF parameters this cipher derives keys with.
    pub fn params(&self) -> KdfParams {
        self.params
    }

    fn derived_key(&self) -> Result<Zeroizing<[u8; 32]>, CipherError> {
        let secret = self.secret.as_ref().map_err(|e| e.clone())?;
        derive_key(secret.expose(), self.params)
    }

    /// Encrypt `plaintext` into an `<ivHex>:<cipherHex>` token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let key = self.derived_key()?;

        let mut iv = [0u8; IV_LEN];
        SystemRandom::new()
            .fill(&mut iv)
            .map_err(|_| CipherError::Encryption)?;

        let encryptor = Aes256CbcEnc::new_from_slices(key.as_ref(), &iv)
            .map_err(|_| CipherError::Encryption)?;
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(CipherToken::new(iv, ciphertext).to_string())
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// The token shape is checked before any key is derived. Wrong keys,
    /// corrupted ciphertext and bad padding all report [`CipherError::Decryption`].
    pub fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let token: CipherToken = token.parse()?;
        if token.ciphertext.is_empty() || token.ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::Decryption);
        }

        let key = self.derived_key()?;
        let decryptor = Aes256CbcDec::new_from_slices(key.as_ref(), &token.iv)
            .map_err(|_| CipherError::Decryption)?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&token.ciphertext)
            .map_err(|_| CipherError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption)
    }

    /// [`encrypt`](Self::encrypt) on the blocking pool.
    pub async fn encrypt_async(&self, plaintext: String) -> Result<String, CipherError> {
        let cipher = self.clone();
        let plaintext = Zeroizing::new(plaintext);
        tokio::task::spawn_blocking(move || cipher.encrypt(&plaintext))
            .await
            .map_err(|_| CipherError::Encryption)?
    }

    /// [`decrypt`](Self::decrypt) on the blocking pool.
    pub async fn decrypt_async(&self, token: String) -> Result<String, CipherError> {
        let cipher = self.clone();
        tokio::task::spawn_blocking(move || cipher.decrypt(&token))
            .await
            .map_err(|_| CipherError::Decryption)?
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("configured", &self.is_configured())
            .field("params", &self.params)
            .finish()
    }
}
