// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and KDF cost floors.

use crate::diagnostic::ConfigError;
use crate::model::KeywardConfig;

/// Lowest accepted scrypt cost exponent. Anything cheaper is test-only territory.
pub const MIN_KDF_LOG_N: u8 = 10;

/// Highest scrypt cost exponent accepted (N = 2^20 already needs 1 GiB at r = 8).
pub const MAX_KDF_LOG_N: u8 = 20;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeywardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    check_env_name(&mut errors, "cipher.secret_key_env", &config.cipher.secret_key_env);

    if !(MIN_KDF_LOG_N..=MAX_KDF_LOG_N).contains(&config.cipher.kdf_log_n) {
        errors.push(ConfigError::Validation {
            message: format!(
                "cipher.kdf_log_n must be between {MIN_KDF_LOG_N} and {MAX_KDF_LOG_N}, got {}",
                config.cipher.kdf_log_n
            ),
        });
    }

    if config.cipher.kdf_r < 1 {
        errors.push(ConfigError::Validation {
            message: format!("cipher.kdf_r must be at least 1, got {}", config.cipher.kdf_r),
        });
    }

    if config.cipher.kdf_p < 1 {
        errors.push(ConfigError::Validation {
            message: format!("cipher.kdf_p must be at least 1, got {}", config.cipher.kdf_p),
        });
    }

    let cookie = config.auth.cookie_name.trim();
    if cookie.is_empty()
        || !cookie
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(ConfigError::Validation {
            message: format!("auth.cookie_name `{cookie}` is not a valid cookie name"),
        });
    }

    if config.auth.session_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.session_ttl_secs must be greater than zero".to_string(),
        });
    }

    if config.auth.code_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.code_ttl_secs must be greater than zero".to_string(),
        });
    }

    let assistant = &config.assistant;
    check_env_name(&mut errors, "assistant.api_key_env", &assistant.api_key_env);

    if !(assistant.base_url.starts_with("https://") || assistant.base_url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!(
                "assistant.base_url `{}` must be an http or https URL",
                assistant.base_url
            ),
        });
    }

    if assistant.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "assistant.model must not be empty".to_string(),
        });
    }

    if assistant.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "assistant.max_tokens must be greater than zero".to_string(),
        });
    }

    if !(0.0_f32..=2.0).contains(&assistant.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "assistant.temperature must be between 0.0 and 2.0, got {}",
                assistant.temperature
            ),
        });
    }

    if assistant.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "assistant.timeout_secs must be greater than zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_env_name(errors: &mut Vec<ConfigError>, setting: &str, value: &str) {
    let name = value.trim();
    if name.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{setting} must not be empty"),
        });
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        errors.push(ConfigError::Validation {
            message: format!("{setting} `{name}` is not a valid environment variable name"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = KeywardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = KeywardConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn cheap_kdf_is_rejected() {
        let mut config = KeywardConfig::default();
        config.cipher.kdf_log_n = 4;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "kdf_log_n"));
    }

    #[test]
    fn kdf_floor_is_accepted() {
        let mut config = KeywardConfig::default();
        config.cipher.kdf_log_n = MIN_KDF_LOG_N;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_secret_env_name_is_rejected() {
        let mut config = KeywardConfig::default();
        config.cipher.secret_key_env = "NOT VALID".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "secret_key_env"));
    }

    #[test]
    fn assistant_settings_are_range_checked() {
        let mut config = KeywardConfig::default();
        config.assistant.api_key_env = "openai-key".to_string();
        config.assistant.base_url = "api.openai.com".to_string();
        config.assistant.max_tokens = 0;
        config.assistant.temperature = 2.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(has_error(&errors, "assistant.api_key_env"));
        assert!(has_error(&errors, "assistant.base_url"));
        assert!(has_error(&errors, "assistant.max_tokens"));
        assert!(has_error(&errors, "assistant.temperature"));
    }

    #[test]
    fn local_assistant_endpoint_is_accepted() {
        let toml_str = r#"
[assistant]
base_url = "http://127.0.0.1:11434/v1"
model = "llama3"
temperature = 0.0
"#;
        let config: KeywardConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.assistant.max_tokens, 300);
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = KeywardConfig::default();
        config.server.host = " ".to_string();
        config.auth.session_ttl_secs = 0;
        config.log.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "server.host"));
        assert!(has_error(&errors, "session_ttl_secs"));
        assert!(has_error(&errors, "log.level"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = KeywardConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        config.storage.database_path = "/tmp/test.db".to_string();
        config.auth.cookie_name = "keyward_session".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn toml_config_with_cheap_kdf_fails_validation() {
        let toml_str = r#"
[cipher]
kdf_log_n = 8
"#;
        let config: KeywardConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "kdf_log_n"));
    }

    #[test]
    fn secret_itself_is_not_a_config_key() {
        let toml_str = r#"
[cipher]
secret_key = "hunter2"
"#;
        assert!(toml::from_str::<KeywardConfig>(toml_str).is_err());
    }
}
