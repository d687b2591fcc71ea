//! Storage layer for the prompt journal
//!
//! Ties a `KeyValueStore` to the repository, the backup manager, and the
//! export/import service. All of them share the same key layout:
//!
//! - `promptJournal.prompts` holds the JSON array of entries
//! - `promptJournal.backup.<timestamp>` holds one snapshot each

pub mod entries;

pub use entries::EntryRepository;

use crate::backup::BackupManager;
use crate::config::paths::JournalPaths;
use crate::error::JournalError;
use crate::services::ExchangeService;
use crate::store::{FileStore, KeyValueStore};

/// Key holding the serialized collection
pub const COLLECTION_KEY: &str = "promptJournal.prompts";

/// Prefix shared by every backup key
pub const BACKUP_PREFIX: &str = "promptJournal.backup.";

/// Storage coordinator giving access to every component over one store
pub struct Storage<S: KeyValueStore = FileStore> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    /// Wrap an existing store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entry CRUD
    pub fn entries(&self) -> EntryRepository<'_> {
        EntryRepository::new(&self.store)
    }

    /// Backup snapshots
    pub fn backups(&self) -> BackupManager<'_> {
        BackupManager::new(&self.store)
    }

    /// Export and import
    pub fn exchange(&self) -> ExchangeService<'_> {
        ExchangeService::new(&self.store)
    }
}

impl Storage<FileStore> {
    /// Open the file-backed store under the journal's data directory
    pub fn open(paths: &JournalPaths) -> Result<Self, JournalError> {
        paths.ensure_directories()?;
        Ok(Self::new(FileStore::open(paths.store_dir())?))
    }

    /// Whether the journal has been initialized
    pub fn is_initialized(paths: &JournalPaths) -> bool {
        paths.is_initialized()
    }
}
