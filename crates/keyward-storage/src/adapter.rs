// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use keyward_config::model::StorageConfig;
use keyward_core::{
    EntryKey, HealthStatus, KeywardError, PluginAdapter, Session, StorageAdapter, User, VaultEntry,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database. `initialize` becomes a no-op.
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, KeywardError> {
        self.db.get().ok_or_else(|| KeywardError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), KeywardError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, KeywardError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KeywardError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), KeywardError> {
        if self.db.initialized() {
            return Ok(());
        }
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| KeywardError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), KeywardError> {
        self.db()?;
        self.checkpoint().await
    }

    // --- Users ---

    async fn create_user(&self, user: &User) -> Result<(), KeywardError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, KeywardError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, KeywardError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }

    async fn update_user(
        &self,
        id: &str,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, KeywardError> {
        queries::users::update_user(self.db()?, id, name, password_hash).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool, KeywardError> {
        queries::users::delete_user(self.db()?, id).await
    }

    // --- Sessions ---

    async fn create_session(&self, session: &Session) -> Result<(), KeywardError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<Session>, KeywardError> {
        queries::sessions::get_session(self.db()?, token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, KeywardError> {
        queries::sessions::delete_session(self.db()?, token_hash).await
    }

    async fn delete_sessions_for_user(&self, user_id: &str) -> Result<u64, KeywardError> {
        queries::sessions::delete_sessions_for_user(self.db()?, user_id).await
    }

    async fn purge_expired_sessions(&self, now: &str) -> Result<u64, KeywardError> {
        queries::sessions::purge_expired_sessions(self.db()?, now).await
    }

    // --- Vault entries ---

    async fn insert_entry(&self, entry: &VaultEntry) -> Result<(), KeywardError> {
        queries::entries::insert_entry(self.db()?, entry).await
    }

    async fn find_entry(
        &self,
        user_id: &str,
        key: &EntryKey,
    ) -> Result<Option<VaultEntry>, KeywardError> {
        queries::entries::find_entry(self.db()?, user_id, key).await
    }

    async fn list_entries(&self, user_id: &str) -> Result<Vec<VaultEntry>, KeywardError> {
        queries::entries::list_entries(self.db()?, user_id).await
    }

    async fn update_entry(&self, entry: &VaultEntry) -> Result<(), KeywardError> {
        queries::entries::update_entry(self.db()?, entry).await
    }

    async fn delete_entry(&self, user_id: &str, key: &EntryKey) -> Result<bool, KeywardError> {
        queries::entries::delete_entry(self.db()?, user_id, key).await
    }

    async fn delete_all_entries(&self, user_id: &str) -> Result<u64, KeywardError> {
        queries::entries::delete_all_entries(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(dir.path().join("x.db").to_str().unwrap()));

        let err = storage.get_user("u1").await.unwrap_err();
        assert!(matches!(err, KeywardError::Storage { .. }));
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn initialize_twice_is_harmless() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(dir.path().join("twice.db").to_str().unwrap()));
        storage.initialize().await.unwrap();
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn wrapped_in_memory_database_is_ready() {
        let db = Database::open_in_memory().await.unwrap();
        let storage = SqliteStorage::from_database(db);
        storage.initialize().await.unwrap();
        assert!(storage.list_entries("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_checkpoints_wal() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(dir.path().join("close.db").to_str().unwrap()));
        storage.initialize().await.unwrap();
        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
