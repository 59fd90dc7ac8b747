//! Persistent key-value storage
//!
//! Meta progression is written through this trait so the core stays free of
//! file I/O. `dice-save` provides the on-disk implementation.

use hashbrown::HashMap;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),

    #[error("Stored value for '{0}' is not valid JSON")]
    Malformed(String),
}

/// A store of JSON documents keyed by name
pub trait KeyValueStore {
    /// `Ok(None)` when nothing was saved under `key`
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
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
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
