// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::KeywardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EntryKey, Session, User, VaultEntry};

/// Adapter for the account, session, and vault record store.
///
/// The store is a dumb persistence layer: it never encrypts or decrypts.
/// Whatever lands in [`VaultEntry::password_token`] is persisted verbatim,
/// so callers are responsible for handing it a ciphertext token only.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), KeywardError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), KeywardError>;

    // --- Users ---

    /// Creates a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), KeywardError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, KeywardError>;

    /// Email lookup is case-insensitive.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, KeywardError>;

    /// Updates the provided fields and returns the updated user, if it exists.
    async fn update_user(
        &self,
        id: &str,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, KeywardError>;

    /// Deletes a user together with its sessions and vault entries.
    async fn delete_user(&self, id: &str) -> Result<bool, KeywardError>;

    // --- Sessions ---

    async fn create_session(&self, session: &Session) -> Result<(), KeywardError>;

    async fn get_session(&self, token_hash: &str) -> Result<Option<Session>, KeywardError>;

    async fn delete_session(&self, token_hash: &str) -> Result<bool, KeywardError>;

    async fn delete_sessions_for_user(&self, user_id: &str) -> Result<u64, KeywardError>;

    /// Removes sessions whose `expires_at` is at or before `now` (RFC 3339).
    async fn purge_expired_sessions(&self, now: &str) -> Result<u64, KeywardError>;

    // --- Vault entries ---

    /// Inserts an entry. Fails with `Conflict` if `(user, site_name, email)` exists.
    async fn insert_entry(&self, entry: &VaultEntry) -> Result<(), KeywardError>;

    async fn find_entry(
        &self,
        user_id: &str,
        key: &EntryKey,
    ) -> Result<Option<VaultEntry>, KeywardError>;

    /// Lists a user's entries ordered by site name, then email.
    async fn list_entries(&self, user_id: &str) -> Result<Vec<VaultEntry>, KeywardError>;

    /// Overwrites the entry with the same `id` and `user_id`.
    ///
    /// Fails with `NotFound` if no such entry exists and with `Conflict` if the
    /// new identity collides with another entry.
    async fn update_entry(&self, entry: &VaultEntry) -> Result<(), KeywardError>;

    async fn delete_entry(&self, user_id: &str, key: &EntryKey) -> Result<bool, KeywardError>;

    async fn delete_all_entries(&self, user_id: &str) -> Result<u64, KeywardError>;
}
