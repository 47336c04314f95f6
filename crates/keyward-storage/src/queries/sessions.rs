// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login session operations.

use keyward_core::{KeywardError, Session};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Create a new session.
pub async fn create_session(db: &Database, session: &Session) -> Result<(), KeywardError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session.token_hash,
                    session.user_id,
                    session.created_at,
                    session.expires_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a session by token hash.
pub async fn get_session(db: &Database, token_hash: &str) -> Result<Option<Session>, KeywardError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT token_hash, user_id, created_at, expires_at
                 FROM sessions WHERE token_hash = ?1",
            )?;
            let result = stmt.query_row(params![token_hash], |row| {
                Ok(Session {
                    token_hash: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: row.get(2)?,
                    expires_at: row.get(3)?,
                })
            });
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one session.
pub async fn delete_session(db: &Database, token_hash: &str) -> Result<bool, KeywardError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM sessions WHERE token_hash = ?1",
                params![token_hash],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every session of a user.
pub async fn delete_sessions_for_user(db: &Database, user_id: &str) -> Result<u64, KeywardError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
            Ok(n as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete sessions whose `expires_at` is at or before `now`.
///
/// Timestamps are RFC 3339 UTC strings, which order lexically.
pub async fn purge_expired_sessions(db: &Database, now: &str) -> Result<u64, KeywardError> {
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
            Ok(n as u64)
        })
        .await
        .map_err(map_tr_err)
}
