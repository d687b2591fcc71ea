//! Backup system for the prompt journal
//!
//! Every destructive or merging operation (delete, import) first copies the
//! serialized collection to a key of the form
//! `promptJournal.backup.<timestamp>`. Backups are immutable and stay until
//! they are explicitly deleted or pruned.
//!
//! # Example
//!
//! ```rust,ignore
//! use prompt_journal::backup::BackupManager;
//!
//! let manager = BackupManager::new(&store);
//! let key = manager.create()?;
//! // ... something goes wrong ...
//! manager.restore(&key)?;
//! ```

mod manager;

pub use manager::{backup_key, BackupInfo, BackupManager};
