// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON response bodies.

use keyward_core::User;
use keyward_vault::MaskedEntry;
use serde::Serialize;

/// `{ "success": ..., "message": ... }`, the envelope of every response.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// The envelope plus a payload whose fields sit beside `success` and `message`.
#[derive(Debug, Serialize)]
pub struct ApiData<T> {
    #[serde(flatten)]
    pub envelope: ApiMessage,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiData<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            envelope: ApiMessage::ok(message),
            data,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: Profile,
}

#[derive(Debug, Serialize)]
pub struct EntryBody {
    pub entry: MaskedEntry,
}

#[derive(Debug, Serialize)]
pub struct EntriesBody {
    pub passwords: Vec<MaskedEntry>,
}

#[derive(Debug, Serialize)]
pub struct CountBody {
    pub deleted: u64,
}

/// A single password in the clear. Only built for reveal and generate.
#[derive(Serialize)]
pub struct PasswordBody {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReplyBody {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_fields_sit_beside_the_envelope() {
        let body = ApiData::ok("done", CountBody { deleted: 3 });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert_eq!(json["deleted"], 3);
    }

    #[test]
    fn profile_omits_password_hash() {
        let user = User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$x".into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&UserBody { user: user.into() }).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("createdAt"));
    }
}
