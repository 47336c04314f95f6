// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential-at-rest encryption for Keyward.
//!
//! Saved site passwords are stored as `<ivHex>:<cipherHex>` tokens produced by
//! AES-256-CBC with PKCS#7 padding. The key is derived with scrypt from a single
//! process-wide secret and a fixed salt, so tokens stay decryptable across
//! restarts as long as the secret does not change.

pub mod cipher;
pub mod kdf;
pub mod secret;
pub mod token;

pub use cipher::CredentialCipher;
pub use kdf::KdfParams;
pub use secret::{DEFAULT_SECRET_KEY_ENV, SecretKeyMaterial};
pub use token::CipherToken;
