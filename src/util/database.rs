// src/util/database.rs
// Connection management plus the key/value document store every module persists through

use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Logical storage keys. Per-user keys are scoped by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKey {
    CurrentUser,
    Profile(String),
    Activity(String),
    Balance(String),
    Transactions(String),
    ActiveQuest(String),
    Quests,
}

impl StorageKey {
    pub fn as_key(&self) -> String {
        match self {
            StorageKey::CurrentUser => "campus_user".to_string(),
            StorageKey::Profile(u) => format!("profile_{}", u),
            StorageKey::Activity(u) => format!("activity_{}", u),
            StorageKey::Balance(u) => format!("balance_{}", u),
            StorageKey::Transactions(u) => format!("transactions_{}", u),
            StorageKey::ActiveQuest(u) => format!("active_quest_{}", u),
            StorageKey::Quests => "campus_quests".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Database {
    pub(crate) app_conn: Arc<Mutex<Connection>>,
}

// Manual Debug implementation since Mutex<Connection> doesn't implement Debug
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("app_conn", &"Arc<Mutex<Connection>>")
            .finish()
    }
}

impl Database {
    pub fn new(app_db_path: &Path) -> Result<Self> {
        if let Some(dir) = app_db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create db directory: {}", e)),
                )
            })?;
        }

        Self::from_connection(Connection::open(app_db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Database {
            app_conn: Arc::new(Mutex::new(conn)),
        };
        db.init_core_tables()?;
        Ok(db)
    }

    /// A poisoned lock only means another thread panicked mid-write; the
    /// connection itself is still usable.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.app_conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init_core_tables(&self) -> Result<()> {
        let conn = self.conn();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn put_raw(&self, key: &StorageKey, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key.as_key(), value, now],
        )?;

        Ok(())
    }

    pub fn get_raw(&self, key: &StorageKey) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key.as_key()],
            |row| row.get::<_, String>(0),
        )
        .optional()
    }

    pub fn remove(&self, key: &StorageKey) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key.as_key()])?;
        Ok(())
    }

    pub fn put_json<T: Serialize>(&self, key: &StorageKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.put_raw(key, &json)
    }

    /// Missing keys read as `None`; a stored value that no longer parses is an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_scoped_by_username() {
        assert_eq!(StorageKey::Balance("asha".into()).as_key(), "balance_asha");
        assert_eq!(StorageKey::ActiveQuest("asha".into()).as_key(), "active_quest_asha");
        assert_eq!(StorageKey::Quests.as_key(), "campus_quests");
        assert_eq!(StorageKey::CurrentUser.as_key(), "campus_user");
    }

    #[test]
    fn test_put_get_remove_json() {
        let db = Database::open_in_memory().unwrap();
        let key = StorageKey::Balance("asha".into());

        assert_eq!(db.get_json::<i64>(&key).unwrap(), None);

        db.put_json(&key, &450i64).unwrap();
        assert_eq!(db.get_json::<i64>(&key).unwrap(), Some(450));

        db.put_json(&key, &370i64).unwrap();
        assert_eq!(db.get_json::<i64>(&key).unwrap(), Some(370));

        db.remove(&key).unwrap();
        assert_eq!(db.get_json::<i64>(&key).unwrap(), None);
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let key = StorageKey::Balance("asha".into());
        db.put_raw(&key, "not json").unwrap();

        assert!(db.get_json::<i64>(&key).is_err());
    }

    #[test]
    fn test_file_database_persists_between_opens() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("campus.db");

        {
            let db = Database::new(&path).unwrap();
            db.put_json(&StorageKey::Quests, &vec!["a", "b"]).unwrap();
        }

        let db = Database::new(&path).unwrap();
        let quests: Option<Vec<String>> = db.get_json(&StorageKey::Quests).unwrap();
        assert_eq!(quests, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
