// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account CRUD operations.

use keyward_core::{KeywardError, User};
use rusqlite::params;

use crate::database::{Database, is_constraint_violation, map_tr_err};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Insert a new account. A taken email yields `Conflict`.
pub async fn create_user(db: &Database, user: &User) -> Result<(), KeywardError> {
    let user = user.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.password_hash,
                    user.created_at,
                    user.updated_at,
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
        Err(KeywardError::Conflict(
            "an account with this email already exists".to_string(),
        ))
    }
}

/// Get an account by id.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, KeywardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
            match stmt.query_row(params![id], user_from_row) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get an account by email, case-insensitively.
pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, KeywardError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))?;
            match stmt.query_row(params![email], user_from_row) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Update name and/or password hash. Returns the updated row, or `None` if
/// the account does not exist.
pub async fn update_user(
    db: &Database,
    id: &str,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, KeywardError> {
    let id = id.to_string();
    let name = name.map(str::to_string);
    let password_hash = password_hash.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET name = COALESCE(?2, name),
                     password_hash = COALESCE(?3, password_hash),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id, name, password_hash],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
            stmt.query_row(params![id], user_from_row).map(Some)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an account. Sessions and vault entries cascade.
pub async fn delete_user(db: &Database, id: &str) -> Result<bool, KeywardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}
