// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Keyward configuration system.

use std::io::Write;

use keyward_config::diagnostic::{ConfigError, suggest_key};
use keyward_config::model::KeywardConfig;
use keyward_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_keyward_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8443

[storage]
database_path = "/tmp/vault.db"
wal_mode = false

[cipher]
secret_key_env = "VAULT_SECRET"
kdf_log_n = 12
kdf_r = 8
kdf_p = 2

[auth]
cookie_name = "session"
secure_cookie = false
session_ttl_secs = 3600
code_ttl_secs = 120

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8443);
    assert_eq!(config.storage.database_path, "/tmp/vault.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.cipher.secret_key_env, "VAULT_SECRET");
    assert_eq!(config.cipher.kdf_log_n, 12);
    assert_eq!(config.cipher.kdf_p, 2);
    assert_eq!(config.auth.cookie_name, "session");
    assert!(!config.auth.secure_cookie);
    assert_eq!(config.auth.session_ttl_secs, 3600);
    assert_eq!(config.auth.code_ttl_secs, 120);
    assert_eq!(config.log.level, "debug");
}

/// An empty document yields compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    let defaults = KeywardConfig::default();
    assert_eq!(config.server.port, defaults.server.port);
    assert_eq!(config.cipher.secret_key_env, "SECRET_KEY_ENCRYPT");
    assert_eq!(config.cipher.kdf_log_n, 14);
    assert_eq!(config.cipher.kdf_r, 8);
    assert_eq!(config.cipher.kdf_p, 1);
    assert_eq!(config.auth.cookie_name, "jwt");
    assert!(config.auth.secure_cookie);
}

/// Partial sections keep defaults for missing keys.
#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[server]\nport = 9000\n").expect("should parse");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
prot = 3000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// The secret itself is never accepted as a config key.
#[test]
fn secret_value_is_not_a_config_key() {
    let toml = r#"
[cipher]
secret_key = "hunter2"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn unknown_key_maps_to_diagnostic_with_suggestion() {
    let toml = r#"
[auth]
cokie_name = "sid"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(!errors.is_empty());
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key,
            section,
            suggestion,
            span,
            ..
        } => {
            key == "cokie_name"
                && section == "auth"
                && suggestion.as_deref() == Some("cookie_name")
                && span.is_some_and(|s| &toml[s.offset()..s.offset() + s.len()] == "cokie_name")
        }
        _ => false,
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

#[test]
fn secret_in_cipher_section_gets_its_own_diagnostic() {
    let toml = r#"
[cipher]
kdf_log_n = 14
secret_key = "hunter2"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    let span = errors.iter().find_map(|e| match e {
        ConfigError::SecretInFile { key, span, .. } if key == "secret_key" => Some(*span),
        _ => None,
    });
    let span = span.flatten().expect("expected SecretInFile with a span");
    assert_eq!(&toml[span.offset()..span.offset() + span.len()], "secret_key");

    let rendered = errors.iter().map(|e| e.to_string()).collect::<String>();
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn wrong_ttl_type_hints_at_seconds() {
    let toml = r#"
[auth]
session_ttl_secs = "15d"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, hint, .. }
            if key == "auth.session_ttl_secs" && hint.contains("seconds")
    )));
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[server]
port = "not-a-port"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(!errors.is_empty());
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[cipher]
kdf_log_n = 2
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_log_n")))
    );
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 4567\n[log]\nlevel = \"warn\"").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.server.port, 4567);
    assert_eq!(config.log.level, "warn");
}

#[test]
fn suggest_key_finds_closest_match() {
    let keys = ["host", "port"];
    assert_eq!(suggest_key("prot", &keys), Some("port".to_string()));
    assert_eq!(suggest_key("hots", &keys), Some("host".to_string()));
    assert_eq!(suggest_key("zzzzzz", &keys), None);
}
