//! Durable key-value stores
//!
//! Every value is a string; callers serialize before `set`. The on-disk
//! store keeps all keys in one JSON object:
//!
//! ```text
//! <dir>/
//!   store.json          # { "<key>": "<string value>", ... }
//!   store.json.lock     # fs2 lock guarding read-modify-write
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// File name of the on-disk store inside its directory
pub const STORE_FILE: &str = "store.json";

/// A durable string-to-string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Erase every key in the store, not just the ones this crate writes.
    fn clear(&mut self) -> Result<()>;
}

/// In-process store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    /// Store rooted at `dir`. Nothing touches the disk until the first write.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_FILE),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }

    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> T,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(Error::Json(err)) => {
                warn!(path = %self.path.display(), %err, "store file unreadable, starting over");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        let out = f(&mut entries);
        self.write_entries(&entries)?;
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn clear(&mut self) -> Result<()> {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        self.write_entries(&BTreeMap::new())
    }
}
