// Synchronous string-keyed storage providers

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flat string-keyed persistence boundary.
///
/// The store reads and writes whole serialized payloads under a small fixed
/// set of keys; providers only need `get`/`set`. Durability across process
/// restarts is expected of the file and SQLite providers, not the in-memory
/// one.
pub trait StorageProvider {
    /// Fetch the payload stored under `key`, or `None` if the key was never
    /// written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the payload stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backend selector, as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
    Memory,
}

/// Build a boxed provider for the selected backend.
///
/// `path` is the data directory for the durable backends; the memory
/// backend ignores it.
pub fn open_provider(backend: Backend, path: &Path) -> Result<Box<dyn StorageProvider>> {
    debug!(?backend, path = %path.display(), "opening storage provider");
    match backend {
        Backend::File => Ok(Box::new(FileStorage::open(path)?)),
        Backend::Sqlite => Ok(Box::new(SqliteStorage::open(path)?)),
        Backend::Memory => Ok(Box::new(MemoryStorage::new())),
    }
}

/// Ephemeral provider for tests and throwaway stores
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a data directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open a file-backed provider rooted at `dir`, creating the directory
    /// if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create storage directory")?;
        Ok(Self { dir })
    }

    /// Directory this provider writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StorageProvider for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage key {}", key))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open storage key {} for writing", key))?;

        // Acquire exclusive lock before replacing the payload
        file.lock_exclusive().context("Failed to acquire file lock")?;
        file.set_len(0)?;

        use std::io::Write;
        file.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write storage key {}", key))?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// Keys become file names, so keep them identifier-like
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

/// Single `kv` table in a SQLite database file
pub struct SqliteStorage {
    db: Connection,
}

impl SqliteStorage {
    /// Open a SQLite-backed provider under `dir`, creating the directory
    /// and the `projstore.db` database if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create storage directory")?;

        let db_path = dir.join("projstore.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        debug!("Creating storage schema");
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self { db })
    }
}

impl StorageProvider for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.db.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt
            .query_row([key], |row| row.get::<_, String>(0))
            .optional()
            .with_context(|| format!("Failed to read storage key {}", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )
            .with_context(|| format!("Failed to write storage key {}", key))?;
        Ok(())
    }
}
