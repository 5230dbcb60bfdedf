//! File-backed key/value store for the durable session
//!
//! A single JSON object on disk, loaded at open and rewritten on every
//! mutation. Stands in for the original web client's localStorage: small,
//! synchronous, survives restarts.

use crate::error::{EchoLedgerError, Result};
use crate::store::KeyValueStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-file-backed store
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path, loading existing contents
    ///
    /// A missing file is an empty store; it is created on first write.
    /// An unreadable or malformed file is an error rather than silent
    /// data loss.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(EchoLedgerError::Io)?;
            serde_json::from_str(&contents).map_err(|e| {
                EchoLedgerError::Storage(format!(
                    "Session file {} is malformed: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Open the default durable-session store under the user data dir
    ///
    /// # Errors
    ///
    /// Returns error if no home directory can be determined or the
    /// session file is unreadable
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "echoledger").ok_or_else(|| {
            EchoLedgerError::Storage("Could not determine a user data directory".to_string())
        })?;
        let dir = dirs.data_dir();
        std::fs::create_dir_all(dir).map_err(EchoLedgerError::Io)?;
        Self::open(dir.join("session.json"))
    }

    fn flush(&self, values: &HashMap<String, String>) {
        match serde_json::to_string_pretty(values) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::error!("Failed to write session file {}: {}", self.path.display(), e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize session state: {}", e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        values.remove(key);
        self.flush(&values);
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        for key in keys {
            values.remove(*key);
        }
        // One write for the whole batch
        self.flush(&values);
    }
}
