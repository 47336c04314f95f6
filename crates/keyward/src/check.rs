// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyward check`: report whether the loaded configuration can serve.

use keyward_cipher::CredentialCipher;
use keyward_config::model::KeywardConfig;
use keyward_core::KeywardError;

/// Lines describing the effective configuration. Never includes either secret.
pub fn report(config: &KeywardConfig, secret_present: bool, api_key_present: bool) -> Vec<String> {
    let secret = if secret_present { "present" } else { "MISSING" };
    let api_key = if api_key_present {
        "present"
    } else {
        "not set, chatbot disabled"
    };
    vec![
        format!("server        {}:{}", config.server.host, config.server.port),
        format!(
            "storage       {} (wal: {})",
            config.storage.database_path, config.storage.wal_mode
        ),
        format!(
            "cipher        scrypt log_n={} r={} p={}",
            config.cipher.kdf_log_n, config.cipher.kdf_r, config.cipher.kdf_p
        ),
        format!("secret key    ${} {secret}", config.cipher.secret_key_env),
        format!(
            "sessions      cookie '{}' ttl {}s, codes ttl {}s",
            config.auth.cookie_name, config.auth.session_ttl_secs, config.auth.code_ttl_secs
        ),
        format!(
            "assistant     {} via {} (${} {api_key})",
            config.assistant.model, config.assistant.base_url, config.assistant.api_key_env
        ),
        format!("log level     {}", config.log.level),
    ]
}

/// Print the report. Fails when the secret key material is missing.
pub fn run_check(config: &KeywardConfig) -> Result<(), KeywardError> {
    let configured = CredentialCipher::from_config(&config.cipher).is_configured();
    let api_key_present = std::env::var(&config.assistant.api_key_env)
        .is_ok_and(|key| !key.trim().is_empty());
    for line in report(config, configured, api_key_present) {
        println!("{line}");
    }
    if configured {
        println!("configuration OK");
        Ok(())
    } else {
        Err(KeywardError::Config(format!(
            "environment variable {} must hold the secret key material",
            config.cipher.secret_key_env
        )))
    }
}
