// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are mapped onto [`ConfigError`]s that miette renders with
//! the offending line of `keyward.toml` underlined. Unknown keys get a
//! "did you mean" hint. A key under `[cipher]` that looks like the secret
//! itself is reported separately: the secret only ever comes from the
//! environment.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::{Path, PathBuf};

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::{DEFAULT_API_KEY_ENV, DEFAULT_SECRET_KEY_ENV};

/// Jaro-Winkler score a known key must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A TOML file that took part in loading, kept for span lookup.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read `path`, or `None` when it does not exist or is unreadable.
    pub fn read(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path)
            .ok()
            .map(|content| Self::new(path, content))
    }
}

/// A configuration problem, rendered through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in [{section}]")]
    #[diagnostic(code(keyward::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        section: String,
        suggestion: Option<String>,
        help: String,
        #[label("not a Keyward setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// Secret key material written into a config file.
    #[error("`{section}.{key}` looks like secret key material")]
    #[diagnostic(code(keyward::config::secret_in_file), help("{help}"))]
    SecretInFile {
        section: String,
        key: String,
        help: String,
        #[label("secrets are never read from config files")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(keyward::config::invalid_type), help("{hint}"))]
    InvalidType {
        key: String,
        found: String,
        hint: String,
    },

    /// A value parsed but is out of range or inconsistent.
    #[error("validation error: {message}")]
    #[diagnostic(code(keyward::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(keyward::config::other))]
    Other(String),
}

/// Convert a figment extraction failure into diagnostics, one per error.
pub fn figment_to_config_errors(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let section = error.path.first().cloned().unwrap_or_default();
            match &error.kind {
                Kind::UnknownField(key, known) => {
                    let (span, src) = locate(&error, sources, &section, key);
                    if looks_like_secret(&section, key) {
                        ConfigError::SecretInFile {
                            help: secret_help(&section),
                            section,
                            key: key.clone(),
                            span,
                            src,
                        }
                    } else {
                        let suggestion = suggest_key(key, known);
                        let help = unknown_key_help(suggestion.as_deref(), known);
                        ConfigError::UnknownKey {
                            key: key.clone(),
                            section: if section.is_empty() {
                                "top level".to_string()
                            } else {
                                section
                            },
                            suggestion,
                            help,
                            span,
                            src,
                        }
                    }
                }
                Kind::InvalidType(found, expected) => {
                    let key = error.path.join(".");
                    ConfigError::InvalidType {
                        hint: type_hint(&key, expected),
                        key,
                        found: found.to_string(),
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn secret_help(section: &str) -> String {
    let (setting, default) = if section == "assistant" {
        ("assistant.api_key_env", DEFAULT_API_KEY_ENV)
    } else {
        ("cipher.secret_key_env", DEFAULT_SECRET_KEY_ENV)
    };
    format!(
        "remove it from the file and export the secret in the environment variable \
         named by `{setting}` (default {default})"
    )
}

/// True for unknown `[cipher]` or `[assistant]` keys that are probably the secret itself.
fn looks_like_secret(section: &str, key: &str) -> bool {
    matches!(section, "cipher" | "assistant")
        && ["secret", "key", "password", "passphrase"]
            .iter()
            .any(|word| key.contains(word))
}

fn unknown_key_help(suggestion: Option<&str>, known: &[&str]) -> String {
    let known = known.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Known keys: {known}"),
        None => format!("known keys: {known}"),
    }
}

fn type_hint(key: &str, expected: &str) -> String {
    if key.ends_with("_ttl_secs") {
        "a whole number of seconds, e.g. `session_ttl_secs = 1296000`".to_string()
    } else if key.starts_with("cipher.kdf_") {
        "an integer scrypt cost, e.g. `kdf_log_n = 14`".to_string()
    } else {
        format!("expected {expected}")
    }
}

/// Best Jaro-Winkler match for `unknown` among `known`, if any is close.
pub fn suggest_key(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

fn locate(
    error: &figment::Error,
    sources: &[ConfigSource],
    section: &str,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.as_path()),
            _ => None,
        });

    let source = match origin {
        Some(origin) => sources.iter().find(|s| origin.ends_with(&s.path)),
        // Inline strings carry no file metadata.
        None if sources.len() == 1 => sources.first(),
        None => None,
    };

    source
        .and_then(|s| {
            key_offset(&s.content, section, key).map(|offset| {
                (
                    Some(SourceSpan::new(offset.into(), key.len())),
                    Some(NamedSource::new(
                        s.path.display().to_string(),
                        s.content.clone(),
                    )),
                )
            })
        })
        .unwrap_or((None, None))
}

/// Byte offset of `key` inside `[section]` (or the top level when
/// `section` is empty). Keys under other headers are not matched.
pub fn key_offset(content: &str, section: &str, key: &str) -> Option<usize> {
    let mut current = "";
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current = header.trim();
        } else if current == section {
            let body = line.trim_start();
            let after = body.strip_prefix(key).map(str::trim_start);
            if after.is_some_and(|rest| rest.starts_with('=')) {
                return Some(offset + line.len() - body.len());
            }
        }
        offset += line.len();
    }
    None
}

/// Print every error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
