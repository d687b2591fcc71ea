//! Entry repository
//!
//! CRUD over the journal collection. The whole collection lives as one JSON
//! array under `COLLECTION_KEY`; every mutation is a read-modify-write that
//! ends in a single store write.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use crate::backup::BackupManager;
use crate::error::{JournalError, JournalResult};
use crate::models::{Entry, EntryDraft, EntryId, Timestamp};
use crate::store::KeyValueStore;
use crate::validate::validate_entry;

use super::COLLECTION_KEY;

/// Repository for journal entries
pub struct EntryRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> EntryRepository<'a> {
    /// Create a repository over `store`
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Read the collection exactly as stored, without validating entries
    ///
    /// Returns an empty collection when nothing has been stored yet, and
    /// `CorruptStore` when the stored value is not a JSON array.
    pub fn get_all(&self) -> JournalResult<Vec<Value>> {
        let raw = match self.store.get(COLLECTION_KEY)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let parsed: Value = serde_json::from_str(&raw).map_err(|e| {
            JournalError::CorruptStore(format!("Failed to parse stored prompts: {}", e))
        })?;

        match parsed {
            Value::Array(entries) => Ok(entries),
            _ => Err(JournalError::CorruptStore(
                "Failed to parse stored prompts: stored data is not an array".into(),
            )),
        }
    }

    /// Read the collection and validate every entry
    ///
    /// Fails with the shape error of the first invalid entry.
    pub fn entries(&self) -> JournalResult<Vec<Entry>> {
        self.get_all()?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                validate_entry(value).map_err(|e| match e {
                    JournalError::Shape(msg) => {
                        JournalError::Shape(format!("stored prompt #{}: {}", index + 1, msg))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Replace the whole collection with a single store write
    pub fn write_all(&self, entries: &[Value]) -> JournalResult<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(COLLECTION_KEY, &json)
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> JournalResult<Option<Entry>> {
        self.get_all()?
            .iter()
            .find(|value| entry_id(value) == Some(id))
            .map(validate_entry)
            .transpose()
    }

    /// Number of stored entries
    pub fn count(&self) -> JournalResult<usize> {
        Ok(self.get_all()?.len())
    }

    /// Insert or replace an entry
    ///
    /// Missing ids are generated, missing timestamps default to now (with
    /// `updatedAt` following `createdAt`), and a missing estimate becomes the
    /// zero estimate. The completed entry must validate before anything is
    /// written.
    pub fn save(&self, draft: impl Into<EntryDraft>) -> JournalResult<Entry> {
        let draft = draft.into();
        let mut all = self.get_all()?;

        let id = match draft.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => unused_id(&all),
        };

        let entry = draft.complete(id, Timestamp::now());
        entry
            .validate()
            .map_err(|e| JournalError::Shape(e.to_string()))?;

        let value = serde_json::to_value(&entry)?;
        match all
            .iter()
            .position(|existing| entry_id(existing) == Some(entry.id.as_str()))
        {
            Some(index) => all[index] = value,
            None => all.push(value),
        }

        self.write_all(&all)?;
        debug!(id = %entry.id, model = %entry.model, "saved journal entry");

        Ok(entry)
    }

    /// Delete an entry, snapshotting the collection first
    ///
    /// Returns the key of the backup taken before the removal.
    pub fn delete_by_id(&self, id: &str) -> JournalResult<String> {
        let mut all = self.get_all()?;
        let index = all
            .iter()
            .position(|value| entry_id(value) == Some(id))
            .ok_or_else(|| JournalError::entry_not_found(id))?;

        let backup_key = BackupManager::new(self.store).create()?;

        all.remove(index);
        self.write_all(&all)?;
        info!(id, backup = %backup_key, "deleted journal entry");

        Ok(backup_key)
    }

    /// Remove the collection entirely. Backups are left alone.
    pub fn clear(&self) -> JournalResult<()> {
        self.store.remove(COLLECTION_KEY)
    }
}

/// The string id of a raw stored entry, if it has one
pub(crate) fn entry_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

/// Generate ids until one is not already taken
fn unused_id(existing: &[Value]) -> EntryId {
    let taken: HashSet<&str> = existing.iter().filter_map(entry_id).collect();
    loop {
        let id = EntryId::generate();
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}
