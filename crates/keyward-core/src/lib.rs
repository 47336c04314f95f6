// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyward password manager.
//!
//! Provides the error taxonomy, the domain types shared by every layer, and
//! the storage and chat provider traits the services are written against.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{CipherError, KeywardError};
pub use time::{format_timestamp, now_timestamp};
pub use traits::{ChatProvider, PluginAdapter, StorageAdapter};
pub use types::{ChatMessage, ChatRole, EntryKey, HealthStatus, Session, User, VaultEntry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyward_error_has_all_variants() {
        let _config = KeywardError::Config("test".into());
        let _storage = KeywardError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _cipher = KeywardError::Cipher(CipherError::Decryption);
        let _validation = KeywardError::Validation("test".into());
        let _unauthorized = KeywardError::Unauthorized("test".into());
        let _not_found = KeywardError::NotFound("test".into());
        let _conflict = KeywardError::Conflict("test".into());
        let _provider = KeywardError::Provider {
            message: "test".into(),
            source: None,
        };
        let _internal = KeywardError::Internal("test".into());
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn storage_trait_is_object_safe() {
        fn _assert_dyn(_: &dyn StorageAdapter) {}
    }

    #[test]
    fn chat_trait_is_object_safe() {
        fn _assert_dyn(_: &dyn ChatProvider) {}
    }
}
