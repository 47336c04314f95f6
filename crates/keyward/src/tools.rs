// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator tooling: token encrypt/decrypt and password generation.

use keyward_cipher::CredentialCipher;
use keyward_config::model::CipherConfig;
use keyward_core::KeywardError;
use keyward_vault::GeneratorOptions;
use secrecy::SecretString;
use tokio::io::AsyncReadExt;

/// Read all of stdin, dropping one trailing line ending.
pub async fn read_stdin() -> Result<String, KeywardError> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(|e| KeywardError::Internal(format!("failed to read stdin: {e}")))?;
    Ok(strip_line_ending(input))
}

fn strip_line_ending(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

pub async fn run_encrypt(config: &CipherConfig) -> Result<String, KeywardError> {
    let plaintext = read_stdin().await?;
    let cipher = CredentialCipher::from_config(config);
    Ok(cipher.encrypt_async(plaintext).await?)
}

pub async fn run_decrypt(config: &CipherConfig) -> Result<SecretString, KeywardError> {
    let token = read_stdin().await?;
    let cipher = CredentialCipher::from_config(config);
    let plaintext = cipher.decrypt_async(token.trim().to_string()).await?;
    Ok(SecretString::from(plaintext))
}

pub fn run_generate(options: &GeneratorOptions, shuffle: Option<&str>) -> Result<String, KeywardError> {
    match shuffle {
        Some(existing) => keyward_vault::shuffle(existing),
        None => keyward_vault::generate(options),
    }
}
