//! Session storage for the Echo Ledger client
//!
//! Two kinds of client state live behind one small trait:
//!
//! - the ephemeral registration draft, scoped to the running process the
//!   way the original web client scoped it to a browser tab
//! - the durable authenticated session (bearer token plus profile), which
//!   survives process restarts
//!
//! The [`KeyValueStore`] trait is injected rather than reached for as an
//! ambient global, so tests run everything against [`MemoryStore`].

mod draft;
mod file;
mod session;

pub use draft::{DraftSnapshot, SessionDraft};
pub use file::FileStore;
pub use session::DurableSession;

use std::collections::HashMap;
use std::sync::Mutex;

/// String key/value storage with single-writer semantics
///
/// Implementations are synchronous; all writers run on the one driving
/// task, matching the original single-UI-thread discipline.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str);

    /// Delete a value
    fn remove(&self, key: &str);

    /// Delete several values in one operation
    ///
    /// Implementations that persist externally should make this a single
    /// write so a flow-completion clear cannot be observed half-done.
    fn remove_many(&self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }
}

/// In-memory store backing the ephemeral draft and all tests
///
/// # Examples
///
/// ```
/// use echoledger::store::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("accountType", "BUSINESS");
/// assert_eq!(store.get("accountType"), Some("BUSINESS".to_string()));
/// store.remove("accountType");
/// assert_eq!(store.get("accountType"), None);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().expect("store mutex poisoned").remove(key);
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        for key in keys {
            values.remove(*key);
        }
    }
}
