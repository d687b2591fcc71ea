//! In-memory key-value store

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{JournalError, JournalResult};

use super::KeyValueStore;

/// Volatile store backed by a sorted map
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held
    pub fn len(&self) -> JournalResult<usize> {
        let data = self.data.read().map_err(|e| {
            JournalError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> JournalResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> JournalResult<Option<String>> {
        let data = self.data.read().map_err(|e| {
            JournalError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> JournalResult<()> {
        let mut data = self.data.write().map_err(|e| {
            JournalError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> JournalResult<()> {
        let mut data = self.data.write().map_err(|e| {
            JournalError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.remove(key);
        Ok(())
    }

    fn keys(&self) -> JournalResult<Vec<String>> {
        let data = self.data.read().map_err(|e| {
            JournalError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.keys().cloned().collect())
    }
}
