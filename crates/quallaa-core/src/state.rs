use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{QuallaaError, Result};

/// Content-hash cache carried across restarts. The in-memory graph is always
/// rebuilt from the note files on open; this store only answers "did this
/// note's bytes actually change", which suppresses spurious change events and
/// no-op rescans.
#[derive(Clone)]
pub struct SqliteStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStateStore").finish_non_exhaustive()
    }
}

impl SqliteStateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| QuallaaError::Internal("sqlite mutex poisoned".to_string()))
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS index_state (
                key TEXT PRIMARY KEY,
                content_hash TEXT NOT NULL,
                mtime INTEGER NOT NULL,
                indexed_at TEXT NOT NULL,
                status TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub fn get_content_hash(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let hash = conn
            .query_row(
                "SELECT content_hash FROM index_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(hash)
    }

    pub fn upsert_index_state(&self, key: &str, content_hash: &str, mtime: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO index_state (key, content_hash, mtime, indexed_at, status)
             VALUES (?1, ?2, ?3, ?4, 'indexed')
             ON CONFLICT(key) DO UPDATE SET
                 content_hash = excluded.content_hash,
                 mtime = excluded.mtime,
                 indexed_at = excluded.indexed_at,
                 status = excluded.status",
            params![key, content_hash, mtime, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove_index_state(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM index_state WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn tracked_keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut statement = conn.prepare("SELECT key FROM index_state ORDER BY key")?;
        let rows = statement.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    pub fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM index_state", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn upsert_get_remove_round_trip() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteStateStore::open(temp.path().join("state.sqlite3")).expect("open");

        assert_eq!(store.get_content_hash("a.md").expect("get"), None);
        store.upsert_index_state("a.md", "hash-1", 10).expect("upsert");
        assert_eq!(
            store.get_content_hash("a.md").expect("get"),
            Some("hash-1".to_string())
        );

        store.upsert_index_state("a.md", "hash-2", 20).expect("update");
        assert_eq!(
            store.get_content_hash("a.md").expect("get"),
            Some("hash-2".to_string())
        );

        store.remove_index_state("a.md").expect("remove");
        assert_eq!(store.get_content_hash("a.md").expect("get"), None);
    }

    #[test]
    fn tracked_keys_are_sorted_and_clearable() {
        let temp = tempdir().expect("tempdir");
        let store = SqliteStateStore::open(temp.path().join("state.sqlite3")).expect("open");
        store.upsert_index_state("b.md", "h", 0).expect("b");
        store.upsert_index_state("a.md", "h", 0).expect("a");

        assert_eq!(store.tracked_keys().expect("keys"), vec!["a.md", "b.md"]);
        store.clear().expect("clear");
        assert!(store.tracked_keys().expect("keys").is_empty());
    }
}
