// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Keyward.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! The credential secret is deliberately absent from this model: only the
//! *name* of the environment variable that carries it is configurable.

use serde::{Deserialize, Serialize};

/// Top-level Keyward configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential cipher settings.
    #[serde(default)]
    pub cipher: CipherConfig,

    /// Account, session, and verification-code settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Chat assistant settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("keyward").join("keyward.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "keyward.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Credential cipher configuration.
///
/// The scrypt parameters are fixed for the lifetime of a dataset: tokens
/// written under one set of parameters only decrypt under the same set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    /// Name of the environment variable holding the secret key material.
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,

    /// scrypt CPU/memory cost as a power of two (default: 14, i.e. N = 16384).
    #[serde(default = "default_kdf_log_n")]
    pub kdf_log_n: u8,

    /// scrypt block size (default: 8).
    #[serde(default = "default_kdf_r")]
    pub kdf_r: u32,

    /// scrypt parallelism (default: 1).
    #[serde(default = "default_kdf_p")]
    pub kdf_p: u32,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            secret_key_env: default_secret_key_env(),
            kdf_log_n: default_kdf_log_n(),
            kdf_r: default_kdf_r(),
            kdf_p: default_kdf_p(),
        }
    }
}

/// Environment variable holding the secret key material unless configured otherwise.
pub const DEFAULT_SECRET_KEY_ENV: &str = "SECRET_KEY_ENCRYPT";

fn default_secret_key_env() -> String {
    DEFAULT_SECRET_KEY_ENV.to_string()
}

fn default_kdf_log_n() -> u8 {
    14
}

fn default_kdf_r() -> u32 {
    8
}

fn default_kdf_p() -> u32 {
    1
}

/// Account and session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Set the `Secure` attribute on the session cookie.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,

    /// Session lifetime in seconds (default: 15 days).
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Lifetime of email verification and password reset codes in seconds.
    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookie: default_secure_cookie(),
            session_ttl_secs: default_session_ttl_secs(),
            code_ttl_secs: default_code_ttl_secs(),
        }
    }
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}

fn default_secure_cookie() -> bool {
    true
}

fn default_session_ttl_secs() -> u64 {
    15 * 24 * 60 * 60
}

fn default_code_ttl_secs() -> u64 {
    5 * 60
}

/// Chat assistant configuration.
///
/// Any OpenAI-compatible chat completions endpoint works. Like the cipher
/// secret, the API key never lives in a file: only the variable name does.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Name of the environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the provider API, without the `/chat/completions` suffix.
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// Upper bound on tokens per reply.
    #[serde(default = "default_assistant_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature, 0.0 to 2.0.
    #[serde(default = "default_assistant_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_assistant_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_assistant_base_url(),
            model: default_assistant_model(),
            max_tokens: default_assistant_max_tokens(),
            temperature: default_assistant_temperature(),
            timeout_secs: default_assistant_timeout_secs(),
        }
    }
}

/// Environment variable holding the assistant API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_assistant_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_assistant_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_assistant_max_tokens() -> u32 {
    300
}

fn default_assistant_temperature() -> f32 {
    0.7
}

fn default_assistant_timeout_secs() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
