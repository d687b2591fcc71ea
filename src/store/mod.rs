//! Key-value store abstraction
//!
//! The journal persists everything as string values under string keys. The
//! services never touch the environment directly; they receive a
//! `KeyValueStore` so tests can substitute the in-memory fake.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::JournalResult;

/// A persistent string-keyed, string-valued store
///
/// Implementations use interior mutability so a single store can be shared
/// by the repository, the backup manager, and the exchange service.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> JournalResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> JournalResult<()>;

    /// Remove `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> JournalResult<()>;

    /// Enumerate every key currently present
    fn keys(&self) -> JournalResult<Vec<String>>;

    /// Check whether `key` is present
    fn contains(&self, key: &str) -> JournalResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> JournalResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> JournalResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> JournalResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> JournalResult<Vec<String>> {
        (**self).keys()
    }
}
