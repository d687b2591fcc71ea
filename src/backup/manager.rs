//! Backup manager for the prompt journal
//!
//! Snapshots the serialized collection under timestamped keys and copies a
//! snapshot back on restore.

use tracing::{debug, info};

use crate::error::{JournalError, JournalResult};
use crate::models::Timestamp;
use crate::storage::{BACKUP_PREFIX, COLLECTION_KEY};
use crate::store::KeyValueStore;

/// Metadata about a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Full store key
    pub key: String,
    /// The key's timestamp suffix, as written
    pub timestamp: String,
    /// Parsed timestamp, when the suffix is canonical
    pub created_at: Option<Timestamp>,
}

impl BackupInfo {
    fn from_key(key: &str) -> Option<Self> {
        let timestamp = key.strip_prefix(BACKUP_PREFIX)?;
        Some(Self {
            key: key.to_string(),
            timestamp: timestamp.to_string(),
            created_at: Timestamp::parse(timestamp),
        })
    }
}

/// Build the backup key for a given instant
pub fn backup_key(at: Timestamp) -> String {
    format!("{}{}", BACKUP_PREFIX, at)
}

/// Creates, lists, restores and deletes collection snapshots
pub struct BackupManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> BackupManager<'a> {
    /// Create a new BackupManager
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Snapshot the current collection
    ///
    /// The raw stored value is copied verbatim (`[]` when nothing is stored).
    /// If a backup already exists for this millisecond the key is moved
    /// forward until it is free, so snapshots never overwrite each other.
    pub fn create(&self) -> JournalResult<String> {
        let raw = self
            .store
            .get(COLLECTION_KEY)?
            .unwrap_or_else(|| "[]".to_string());

        let mut at = Timestamp::now();
        let mut key = backup_key(at);
        while self.store.contains(&key)? {
            at = at.plus_millis(1);
            key = backup_key(at);
        }

        self.store.set(&key, &raw)?;
        debug!(backup = %key, bytes = raw.len(), "created backup");

        Ok(key)
    }

    /// Overwrite the live collection with a backup's content
    ///
    /// The snapshot is not re-validated: restore is the rollback path and
    /// must reproduce exactly what was saved.
    pub fn restore(&self, key: &str) -> JournalResult<()> {
        if !key.starts_with(BACKUP_PREFIX) {
            return Err(JournalError::backup_not_found(key));
        }

        let raw = self
            .store
            .get(key)?
            .ok_or_else(|| JournalError::backup_not_found(key))?;

        self.store.set(COLLECTION_KEY, &raw)?;
        info!(backup = %key, "restored collection from backup");

        Ok(())
    }

    /// List all backups, newest first
    pub fn list(&self) -> JournalResult<Vec<BackupInfo>> {
        let mut backups: Vec<_> = self
            .store
            .keys()?
            .iter()
            .filter_map(|key| BackupInfo::from_key(key))
            .collect();

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Get the most recent backup
    pub fn latest(&self) -> JournalResult<Option<BackupInfo>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Read a backup's raw content
    pub fn read(&self, key: &str) -> JournalResult<String> {
        if !key.starts_with(BACKUP_PREFIX) {
            return Err(JournalError::backup_not_found(key));
        }
        self.store
            .get(key)?
            .ok_or_else(|| JournalError::backup_not_found(key))
    }

    /// Delete a backup. Unknown keys, and keys outside the backup
    /// namespace, are ignored.
    pub fn delete(&self, key: &str) -> JournalResult<()> {
        if !key.starts_with(BACKUP_PREFIX) {
            return Ok(());
        }
        self.store.remove(key)
    }

    /// Delete all but the newest `keep` backups
    ///
    /// Returns the deleted keys.
    pub fn prune(&self, keep: usize) -> JournalResult<Vec<String>> {
        let mut deleted = Vec::new();
        for backup in self.list()?.into_iter().skip(keep) {
            self.store.remove(&backup.key)?;
            deleted.push(backup.key);
        }

        if !deleted.is_empty() {
            info!(deleted = deleted.len(), keep, "pruned backups");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_create_backup_of_empty_store() {
        let store = MemoryStore::new();
        let manager = BackupManager::new(&store);

        let key = manager.create().unwrap();
        assert!(key.starts_with(BACKUP_PREFIX));
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_create_copies_raw_value() {
        let store = MemoryStore::new();
        store.set(COLLECTION_KEY, "not even json").unwrap();
        let manager = BackupManager::new(&store);

        let key = manager.create().unwrap();
        assert_eq!(manager.read(&key).unwrap(), "not even json");
    }

    #[test]
    fn test_backups_in_same_millisecond_do_not_collide() {
        let store = MemoryStore::new();
        let manager = BackupManager::new(&store);

        let keys: Vec<_> = (0..5).map(|_| manager.create().unwrap()).collect();
        let listed = manager.list().unwrap();

        assert_eq!(listed.len(), 5);
        // Newest first
        assert_eq!(listed[0].key, keys[4]);
        assert_eq!(listed[4].key, keys[0]);
        assert!(listed.iter().all(|b| b.created_at.is_some()));
    }

    #[test]
    fn test_list_ignores_other_keys() {
        let store = MemoryStore::new();
        store.set(COLLECTION_KEY, "[]").unwrap();
        store.set("unrelated", "x").unwrap();
        let manager = BackupManager::new(&store);

        assert!(manager.list().unwrap().is_empty());
        assert!(manager.latest().unwrap().is_none());
    }

    #[test]
    fn test_list_orders_by_timestamp() {
        let store = MemoryStore::new();
        store
            .set(&format!("{}2025-01-01T00:00:00.000Z", BACKUP_PREFIX), "[]")
            .unwrap();
        store
            .set(&format!("{}2025-03-01T00:00:00.000Z", BACKUP_PREFIX), "[]")
            .unwrap();
        store
            .set(&format!("{}2025-02-01T00:00:00.000Z", BACKUP_PREFIX), "[]")
            .unwrap();
        let manager = BackupManager::new(&store);

        let timestamps: Vec<_> = manager
            .list()
            .unwrap()
            .into_iter()
            .map(|b| b.timestamp)
            .collect();
        assert_eq!(
            timestamps,
            vec![
                "2025-03-01T00:00:00.000Z",
                "2025-02-01T00:00:00.000Z",
                "2025-01-01T00:00:00.000Z"
            ]
        );
    }

    #[test]
    fn test_restore() {
        let store = MemoryStore::new();
        store.set(COLLECTION_KEY, r#"[{"id":"p_1"}]"#).unwrap();
        let manager = BackupManager::new(&store);

        let key = manager.create().unwrap();
        store.set(COLLECTION_KEY, "[]").unwrap();

        manager.restore(&key).unwrap();
        assert_eq!(
            store.get(COLLECTION_KEY).unwrap().as_deref(),
            Some(r#"[{"id":"p_1"}]"#)
        );
    }

    #[test]
    fn test_restore_missing_backup() {
        let store = MemoryStore::new();
        store.set(COLLECTION_KEY, "[]").unwrap();
        let manager = BackupManager::new(&store);

        let err = manager
            .restore(&format!("{}2020-01-01T00:00:00.000Z", BACKUP_PREFIX))
            .unwrap_err();
        assert!(err.is_not_found());

        // Keys outside the namespace are never treated as backups
        assert!(manager.restore(COLLECTION_KEY).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let manager = BackupManager::new(&store);
        let key = manager.create().unwrap();

        manager.delete(&key).unwrap();
        assert!(manager.list().unwrap().is_empty());

        // Absent key is a no-op
        manager.delete(&key).unwrap();

        store.set(COLLECTION_KEY, "[]").unwrap();
        manager.delete(COLLECTION_KEY).unwrap();
        assert!(store.get(COLLECTION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_prune() {
        let store = MemoryStore::new();
        let manager = BackupManager::new(&store);
        let keys: Vec<_> = (0..4).map(|_| manager.create().unwrap()).collect();

        let deleted = manager.prune(1).unwrap();
        assert_eq!(deleted.len(), 3);

        let remaining = manager.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key, keys[3]);

        assert!(manager.prune(5).unwrap().is_empty());
    }
}
