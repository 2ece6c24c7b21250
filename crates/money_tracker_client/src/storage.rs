//! SQLite client storage: session config (token, username).
//! One `Storage` per data directory; clone the `Arc` to share it between the
//! credential provider and the CLI session commands.

use crate::error::{ClientError, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

pub const DB_FILE: &str = "money_tracker.db";

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| ClientError::Config(format!("cannot create {}: {}", dir.display(), e)))?;
        let db_path = dir.join(DB_FILE);
        tracing::debug!(db = %db_path.display(), "opening client storage");
        let conn = Connection::open(&db_path)?;
        create_tables(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn with_db<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, rusqlite::Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ClientError::Config("storage lock poisoned".to_string()))?;
        Ok(f(&conn)?)
    }

    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.with_db(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
            let mut rows = stmt.query(params![key])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(row.get(0)?));
            }
            Ok(None)
        })
    }

    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.with_db(|conn| {
            conn.execute(
                "INSERT INTO config (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            Ok(())
        })
    }

    pub fn config_remove(&self, key: &str) -> Result<()> {
        self.with_db(|conn| {
            conn.execute("DELETE FROM config WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    pub fn save_session(&self, username: &str, token: &str) -> Result<()> {
        self.config_set(TOKEN_KEY, token)?;
        self.config_set(USERNAME_KEY, username)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.config_remove(TOKEN_KEY)?;
        self.config_remove(USERNAME_KEY)
    }
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS config (key TEXT PRIMARY KEY, value TEXT);")?;
    Ok(())
}
