// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved-credential operations: add, edit, reveal, list, search, and delete.
//!
//! Plaintext passwords cross this layer in exactly two places. On add and
//! edit they are encrypted once and only the token is stored. On reveal a
//! single stored token is decrypted once and handed back as a
//! [`SecretString`]. List and search never touch the cipher.

use std::sync::Arc;

use keyward_cipher::CredentialCipher;
use keyward_core::{EntryKey, KeywardError, StorageAdapter, VaultEntry, now_timestamp};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{error, info};

/// Placeholder returned in place of every password on list and search.
pub const MASKED_PASSWORD: &str = "********";

/// Input for [`VaultService::add`].
pub struct NewEntry {
    pub site_name: String,
    pub site_url: String,
    pub email: String,
    pub password: SecretString,
    pub notes: Option<String>,
}

/// Input for [`VaultService::edit`].
///
/// `site_name` and `email` locate the entry; every `new_*` field that is
/// `Some` replaces the stored value.
pub struct EditEntry {
    pub site_name: String,
    pub email: String,
    pub new_site_name: Option<String>,
    pub new_site_url: Option<String>,
    pub new_email: Option<String>,
    pub new_password: Option<SecretString>,
    pub notes: Option<String>,
}

/// An entry as shown to clients, with the password masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedEntry {
    pub site_name: String,
    pub site_url: String,
    pub email: String,
    pub password: &'static str,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<VaultEntry> for MaskedEntry {
    fn from(entry: VaultEntry) -> Self {
        Self {
            site_name: entry.site_name,
            site_url: entry.site_url,
            email: entry.email,
            password: MASKED_PASSWORD,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Saved-credential service over a storage backend and the credential cipher.
pub struct VaultService<S: ?Sized = dyn StorageAdapter> {
    storage: Arc<S>,
    cipher: CredentialCipher,
}

impl<S: ?Sized> Clone for VaultService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            cipher: self.cipher.clone(),
        }
    }
}

fn require(value: &str, what: &str) -> Result<(), KeywardError> {
    if value.trim().is_empty() {
        Err(KeywardError::Validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}

fn not_found() -> KeywardError {
    KeywardError::NotFound("password not found".to_string())
}

impl<S: StorageAdapter + ?Sized> VaultService<S> {
    pub fn new(storage: Arc<S>, cipher: CredentialCipher) -> Self {
        Self { storage, cipher }
    }

    async fn seal(&self, password: &SecretString, operation: &'static str) -> Result<String, KeywardError> {
        self.cipher
            .encrypt_async(password.expose_secret().to_string())
            .await
            .map_err(|e| {
                error!(operation, error = %e, "failed to encrypt vault password");
                KeywardError::Cipher(e)
            })
    }

    /// Save a new credential.
    pub async fn add(&self, user_id: &str, new: NewEntry) -> Result<MaskedEntry, KeywardError> {
        require(&new.site_name, "site name")?;
        require(&new.site_url, "site URL")?;
        require(&new.email, "email")?;
        require(new.password.expose_secret(), "password")?;

        let key = EntryKey::new(new.site_name.clone(), new.email.clone());
        if self.storage.find_entry(user_id, &key).await?.is_some() {
            return Err(KeywardError::Conflict(
                "a password for this site and email already exists".to_string(),
            ));
        }

        let password_token = self.seal(&new.password, "add").await?;
        let now = now_timestamp();
        let entry = VaultEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            site_name: new.site_name,
            site_url: new.site_url,
            email: new.email,
            password_token,
            notes: new.notes.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.insert_entry(&entry).await?;

        info!(entry_id = %entry.id, "vault entry added");
        Ok(entry.into())
    }

    /// Update a saved credential located by its current site name and email.
    pub async fn edit(&self, user_id: &str, edit: EditEntry) -> Result<MaskedEntry, KeywardError> {
        require(&edit.site_name, "site name")?;
        require(&edit.email, "email")?;
        for (value, what) in [
            (&edit.new_site_name, "site name"),
            (&edit.new_site_url, "site URL"),
            (&edit.new_email, "email"),
        ] {
            if let Some(value) = value {
                require(value, what)?;
            }
        }
        if let Some(password) = &edit.new_password {
            require(password.expose_secret(), "password")?;
        }

        let old_key = EntryKey::new(edit.site_name, edit.email);
        let mut entry = self
            .storage
            .find_entry(user_id, &old_key)
            .await?
            .ok_or_else(not_found)?;

        if let Some(site_name) = edit.new_site_name {
            entry.site_name = site_name;
        }
        if let Some(email) = edit.new_email {
            entry.email = email;
        }
        let new_key = entry.key();
        if new_key != old_key && self.storage.find_entry(user_id, &new_key).await?.is_some() {
            return Err(KeywardError::Conflict(
                "a password for this site and email already exists".to_string(),
            ));
        }

        if let Some(site_url) = edit.new_site_url {
            entry.site_url = site_url;
        }
        if let Some(notes) = edit.notes {
            entry.notes = notes;
        }
        if let Some(password) = &edit.new_password {
            entry.password_token = self.seal(password, "edit").await?;
        }

        self.storage.update_entry(&entry).await?;
        info!(entry_id = %entry.id, password_changed = edit.new_password.is_some(), "vault entry updated");

        let stored = self
            .storage
            .find_entry(user_id, &new_key)
            .await?
            .ok_or_else(not_found)?;
        Ok(stored.into())
    }

    /// Decrypt and return one saved password.
    pub async fn reveal(
        &self,
        user_id: &str,
        site_name: &str,
        email: &str,
    ) -> Result<SecretString, KeywardError> {
        require(site_name, "site name")?;
        require(email, "email")?;

        let key = EntryKey::new(site_name, email);
        let entry = self
            .storage
            .find_entry(user_id, &key)
            .await?
            .ok_or_else(not_found)?;

        let plaintext = self
            .cipher
            .decrypt_async(entry.password_token)
            .await
            .map_err(|e| {
                error!(entry_id = %entry.id, operation = "reveal", error = %e, "failed to decrypt vault entry");
                KeywardError::Cipher(e)
            })?;

        Ok(SecretString::from(plaintext))
    }

    /// All of a user's entries, masked.
    pub async fn list(&self, user_id: &str) -> Result<Vec<MaskedEntry>, KeywardError> {
        let entries = self.storage.list_entries(user_id).await?;
        Ok(entries.into_iter().map(MaskedEntry::from).collect())
    }

    /// Entries whose site name, URL, email, or notes contain `query`, ignoring case.
    pub async fn search(&self, user_id: &str, query: &str) -> Result<Vec<MaskedEntry>, KeywardError> {
        let needle = query.trim().to_lowercase();
        let entries = self.storage.list_entries(user_id).await?;
        Ok(entries
            .into_iter()
            .filter(|e| {
                needle.is_empty()
                    || [&e.site_name, &e.site_url, &e.email, &e.notes]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .map(MaskedEntry::from)
            .collect())
    }

    /// Delete one entry.
    pub async fn delete(&self, user_id: &str, site_name: &str, email: &str) -> Result<(), KeywardError> {
        require(site_name, "site name")?;
        require(email, "email")?;

        let key = EntryKey::new(site_name, email);
        if !self.storage.delete_entry(user_id, &key).await? {
            return Err(not_found());
        }
        info!(user_id, "vault entry deleted");
        Ok(())
    }

    /// Delete every entry of a user. Returns how many were removed.
    pub async fn delete_all(&self, user_id: &str) -> Result<u64, KeywardError> {
        let removed = self.storage.delete_all_entries(user_id).await?;
        info!(user_id, removed, "all vault entries deleted");
        Ok(removed)
    }
}
