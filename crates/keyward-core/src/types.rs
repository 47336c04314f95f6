// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the storage, vault, auth, and gateway crates.

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A registered account.
///
/// `password_hash` is an Argon2id PHC string for the account login password,
/// unrelated to the credential cipher.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// A login session. Only the SHA-256 of the cookie value is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// One saved credential as persisted by the store.
///
/// `password_token` always holds a ciphertext token, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEntry {
    pub id: String,
    pub user_id: String,
    pub site_name: String,
    pub site_url: String,
    pub email: String,
    pub password_token: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The plaintext identity of a vault entry within one user's vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub site_name: String,
    pub email: String,
}

impl EntryKey {
    pub fn new(site_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            email: email.into(),
        }
    }
}

impl VaultEntry {
    /// Returns the `(site_name, email)` identity of this entry.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.site_name.clone(), self.email.clone())
    }
}

/// Speaker of one line in an assistant conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// The role name chat completion APIs expect.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One line of an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_debug_redacts_hash() {
        let user = User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        };
        let out = format!("{user:?}");
        assert!(!out.contains("argon2id"));
        assert!(out.contains("[redacted]"));
    }

    #[test]
    fn entry_key_matches_identity_fields() {
        let entry = VaultEntry {
            id: "e1".into(),
            user_id: "u1".into(),
            site_name: "GitHub".into(),
            site_url: "https://github.com".into(),
            email: "ada@example.com".into(),
            password_token: "00:00".into(),
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(entry.key(), EntryKey::new("GitHub", "ada@example.com"));
    }

    #[test]
    fn chat_roles_use_api_names() {
        assert_eq!(ChatRole::System.as_str(), "system");
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
        let line = ChatMessage::new(ChatRole::User, "hi");
        assert_eq!(line.content, "hi");
    }
}
