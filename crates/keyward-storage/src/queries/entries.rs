// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault entry CRUD operations.
//!
//! Entries are addressed by their plaintext identity `(user_id, site_name, email)`.
//! The `password_token` column is opaque to this module.

use keyward_core::{EntryKey, KeywardError, VaultEntry};
use rusqlite::params;

use crate::database::{Database, is_constraint_violation, map_tr_err};

const ENTRY_COLUMNS: &str =
    "id, user_id, site_name, site_url, email, password_token, notes, created_at, updated_at";

const DUPLICATE_ENTRY: &str = "a password for this site and email already exists";

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VaultEntry> {
    Ok(VaultEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        site_name: row.get(2)?,
        site_url: row.get(3)?,
        email: row.get(4)?,
        password_token: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Insert a new entry. An existing `(site_name, email)` for the user yields `Conflict`.
pub async fn insert_entry(db: &Database, entry: &VaultEntry) -> Result<(), KeywardError> {
    let entry = entry.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO vault_entries
                 (id, user_id, site_name, site_url, email, password_token, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    entry.id,
                    entry.user_id,
                    entry.site_name,
                    entry.site_url,
                    entry.email,
                    entry.password_token,
                    entry.notes,
                    entry.created_at,
                    entry.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_constraint_violation(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(KeywardError::Conflict(DUPLICATE_ENTRY.to_string()))
    }
}

/// Find one entry by identity.
pub async fn find_entry(
    db: &Database,
    user_id: &str,
    key: &EntryKey,
) -> Result<Option<VaultEntry>, KeywardError> {
    let user_id = user_id.to_string();
    let key = key.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM vault_entries
                 WHERE user_id = ?1 AND site_name = ?2 AND email = ?3"
            ))?;
            match stmt.query_row(params![user_id, key.site_name, key.email], entry_from_row) {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List a user's entries ordered by site name, then email.
pub async fn list_entries(db: &Database, user_id: &str) -> Result<Vec<VaultEntry>, KeywardError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM vault_entries
                 WHERE user_id = ?1
                 ORDER BY site_name COLLATE NOCASE, email COLLATE NOCASE"
            ))?;
            let rows = stmt.query_map(params![user_id], entry_from_row)?;
            let entries = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite an entry's fields, matched by id and owner.
///
/// Missing entry yields `NotFound`; moving onto an identity that already
/// exists yields `Conflict`.
pub async fn update_entry(db: &Database, entry: &VaultEntry) -> Result<(), KeywardError> {
    let entry = entry.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "UPDATE vault_entries
                 SET site_name = ?3, site_url = ?4, email = ?5, password_token = ?6, notes = ?7,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND user_id = ?2",
                params![
                    entry.id,
                    entry.user_id,
                    entry.site_name,
                    entry.site_url,
                    entry.email,
                    entry.password_token,
                    entry.notes,
                ],
            );
            match result {
                Ok(0) => Ok(UpdateOutcome::Missing),
                Ok(_) => Ok(UpdateOutcome::Updated),
                Err(e) if is_constraint_violation(&e) => Ok(UpdateOutcome::Duplicate),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        UpdateOutcome::Updated => Ok(()),
        UpdateOutcome::Missing => Err(KeywardError::NotFound("password not found".to_string())),
        UpdateOutcome::Duplicate => Err(KeywardError::Conflict(DUPLICATE_ENTRY.to_string())),
    }
}

enum UpdateOutcome {
    Updated,
    Missing,
    Duplicate,
}

/// Delete one entry by identity.
pub async fn delete_entry(db: &Database, user_id: &str, key: &EntryKey) -> Result<bool, KeywardError> {
    let user_id = user_id.to_string();
    let key = key.clone();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM vault_entries WHERE user_id = ?1 AND site_name = ?2 AND email = ?3",
                params![user_id, key.site_name, key.email],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every entry of a user.
pub async fn delete_all_entries(db: &Database, user_id: &str) -> Result<u64, KeywardError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM vault_entries WHERE user_id = ?1", params![user_id])?;
            Ok(n as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;
    use keyward_core::User;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        for (id, email) in [("u1", "ada@example.com"), ("u2", "bob@example.com")] {
            let user = User {
                id: id.to_string(),
                name: id.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
                updated_at: "2026-01-01T00:00:00.000Z".to_string(),
            };
            users::create_user(&db, &user).await.unwrap();
        }
        db
    }

    fn make_entry(id: &str, user_id: &str, site: &str, email: &str) -> VaultEntry {
        VaultEntry {
            id: id.to_string(),
            user_id: user_id.to_string(),
            site_name: site.to_string(),
            site_url: format!("https://{}.example", site.to_lowercase()),
            email: email.to_string(),
            password_token: "00112233445566778899aabbccddeeff:00112233445566778899aabbccddeeff"
                .to_string(),
            notes: String::new(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_roundtrips() {
        let db = setup_db().await;
        let entry = make_entry("e1", "u1", "GitHub", "ada@example.com");
        insert_entry(&db, &entry).await.unwrap();

        let found = find_entry(&db, "u1", &entry.key()).await.unwrap();
        assert_eq!(found, Some(entry));
    }

    #[tokio::test]
    async fn identity_is_scoped_per_user() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "GitHub", "x@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e2", "u2", "GitHub", "x@example.com")).await.unwrap();

        let key = EntryKey::new("GitHub", "x@example.com");
        assert_eq!(find_entry(&db, "u2", &key).await.unwrap().unwrap().id, "e2");
    }

    #[tokio::test]
    async fn duplicate_identity_is_conflict() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "GitHub", "ada@example.com")).await.unwrap();
        let err = insert_entry(&db, &make_entry("e2", "u1", "GitHub", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, KeywardError::Conflict(_)));
    }

    #[tokio::test]
    async fn identity_matching_is_exact() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "GitHub", "ada@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e2", "u1", "github", "ada@example.com")).await.unwrap();
        assert_eq!(list_entries(&db, "u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_is_ordered_by_site_then_email() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "Zulip", "a@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e2", "u1", "amazon", "b@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e3", "u1", "amazon", "a@example.com")).await.unwrap();

        let ids: Vec<String> = list_entries(&db, "u1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e3", "e2", "e1"]);
    }

    #[tokio::test]
    async fn update_entry_rewrites_fields() {
        let db = setup_db().await;
        let mut entry = make_entry("e1", "u1", "GitHub", "ada@example.com");
        insert_entry(&db, &entry).await.unwrap();

        entry.site_url = "https://github.com/login".to_string();
        entry.notes = "work account".to_string();
        update_entry(&db, &entry).await.unwrap();

        let found = find_entry(&db, "u1", &entry.key()).await.unwrap().unwrap();
        assert_eq!(found.site_url, "https://github.com/login");
        assert_eq!(found.notes, "work account");
    }

    #[tokio::test]
    async fn update_onto_existing_identity_is_conflict() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "GitHub", "ada@example.com")).await.unwrap();
        let mut second = make_entry("e2", "u1", "GitLab", "ada@example.com");
        insert_entry(&db, &second).await.unwrap();

        second.site_name = "GitHub".to_string();
        let err = update_entry(&db, &second).await.unwrap_err();
        assert!(matches!(err, KeywardError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_of_other_users_entry_is_not_found() {
        let db = setup_db().await;
        let mut entry = make_entry("e1", "u1", "GitHub", "ada@example.com");
        insert_entry(&db, &entry).await.unwrap();

        entry.user_id = "u2".to_string();
        let err = update_entry(&db, &entry).await.unwrap_err();
        assert!(matches!(err, KeywardError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_entry_and_delete_all() {
        let db = setup_db().await;
        insert_entry(&db, &make_entry("e1", "u1", "GitHub", "a@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e2", "u1", "GitLab", "a@example.com")).await.unwrap();
        insert_entry(&db, &make_entry("e3", "u2", "GitLab", "a@example.com")).await.unwrap();

        let key = EntryKey::new("GitHub", "a@example.com");
        assert!(delete_entry(&db, "u1", &key).await.unwrap());
        assert!(!delete_entry(&db, "u1", &key).await.unwrap());

        assert_eq!(delete_all_entries(&db, "u1").await.unwrap(), 1);
        assert_eq!(list_entries(&db, "u2").await.unwrap().len(), 1);
    }
}
