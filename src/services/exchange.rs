//! Export and import of the whole journal
//!
//! Export validates every stored entry and wraps them in a versioned
//! document. Import validates an incoming document completely, snapshots the
//! current collection, then either replaces or merges. Any failure after the
//! snapshot restores it before the error is returned.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::backup::BackupManager;
use crate::error::{JournalError, JournalResult};
use crate::export::ExportDocument;
use crate::models::Entry;
use crate::storage::entries::entry_id;
use crate::storage::EntryRepository;
use crate::store::KeyValueStore;
use crate::validate::validate_export_document;

/// Decides, once per import, whether conflicting entries are replaced
///
/// The answer applies to the whole conflict set; there is no per-entry
/// choice. An `Err` is treated as "skip".
pub trait DuplicateResolver {
    fn resolve(&mut self, conflict_count: usize) -> JournalResult<bool>;
}

impl<F> DuplicateResolver for F
where
    F: FnMut(usize) -> JournalResult<bool>,
{
    fn resolve(&mut self, conflict_count: usize) -> JournalResult<bool> {
        self(conflict_count)
    }
}

/// How an import is applied
#[derive(Default)]
pub struct ImportOptions<'r> {
    /// Replace the collection with the incoming entries
    pub replace_all: bool,
    /// Explicit duplicate policy for merges; takes precedence over the resolver
    pub replace_duplicates: Option<bool>,
    /// Asked when merging with conflicts and no explicit policy
    pub on_duplicate_choice: Option<&'r mut dyn DuplicateResolver>,
}

impl<'r> ImportOptions<'r> {
    /// Merge, skipping conflicts unless told otherwise
    pub fn merge() -> Self {
        Self::default()
    }

    /// Replace the whole collection
    pub fn replace_all() -> Self {
        Self {
            replace_all: true,
            ..Self::default()
        }
    }

    pub fn with_replace_duplicates(mut self, replace: bool) -> Self {
        self.replace_duplicates = Some(replace);
        self
    }

    pub fn with_resolver(mut self, resolver: &'r mut dyn DuplicateResolver) -> Self {
        self.on_duplicate_choice = Some(resolver);
        self
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Snapshot taken before the collection was touched
    pub backup_key: String,
    /// Entries appended (or written, in replace-all mode)
    pub added: usize,
    /// Existing entries overwritten by incoming ones
    pub replaced: usize,
    /// Incoming entries dropped in favor of existing ones
    pub skipped: usize,
    /// Incoming entries whose id was already present
    pub conflicts: usize,
}

#[derive(Debug, Default)]
struct MergeCounts {
    added: usize,
    replaced: usize,
    skipped: usize,
    conflicts: usize,
}

/// Service for exporting and importing the journal
pub struct ExchangeService<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ExchangeService<'a> {
    /// Create a new exchange service
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    fn entries(&self) -> EntryRepository<'a> {
        EntryRepository::new(self.store)
    }

    fn backups(&self) -> BackupManager<'a> {
        BackupManager::new(self.store)
    }

    /// Build an export of the current collection
    ///
    /// Fails with the shape error of the first invalid stored entry; a
    /// document is never produced over invalid data.
    pub fn export(&self) -> JournalResult<ExportDocument> {
        let prompts = self.entries().entries()?;
        let document = ExportDocument::new(prompts);
        debug!(
            prompts = document.stats.total_prompts,
            "built export document"
        );
        Ok(document)
    }

    /// Import a document from its JSON text
    pub fn import_str(
        &self,
        text: &str,
        options: ImportOptions<'_>,
    ) -> JournalResult<ImportSummary> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| JournalError::Shape(format!("Failed to parse JSON: {}", e)))?;
        self.import_value(&document, options)
    }

    /// Import an already-parsed document
    ///
    /// Nothing is written unless the whole document validates. Once it does,
    /// the current collection is backed up (in every mode), the mutation is
    /// applied, and on failure the backup is restored. A failed restore is
    /// logged; the caller always sees the original error.
    pub fn import_value(
        &self,
        document: &Value,
        options: ImportOptions<'_>,
    ) -> JournalResult<ImportSummary> {
        let incoming = validate_export_document(document)?;

        let backup_key = self.backups().create()?;

        match self.apply(incoming, options) {
            Ok(counts) => {
                info!(
                    backup = %backup_key,
                    added = counts.added,
                    replaced = counts.replaced,
                    skipped = counts.skipped,
                    "imported journal"
                );
                Ok(ImportSummary {
                    backup_key,
                    added: counts.added,
                    replaced: counts.replaced,
                    skipped: counts.skipped,
                    conflicts: counts.conflicts,
                })
            }
            Err(err) => {
                warn!(error = %err, backup = %backup_key, "import failed, rolling back");
                if let Err(rollback_err) = self.backups().restore(&backup_key) {
                    error!(
                        error = %rollback_err,
                        backup = %backup_key,
                        "rollback after failed import also failed"
                    );
                }
                Err(err)
            }
        }
    }

    fn apply(
        &self,
        incoming: Vec<Entry>,
        options: ImportOptions<'_>,
    ) -> JournalResult<MergeCounts> {
        let ImportOptions {
            replace_all,
            replace_duplicates,
            on_duplicate_choice,
        } = options;

        let incoming = incoming
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;

        if replace_all {
            let counts = MergeCounts {
                added: incoming.len(),
                ..MergeCounts::default()
            };
            self.entries().write_all(&incoming)?;
            return Ok(counts);
        }

        let mut merged = self.entries().get_all()?;
        let mut positions: HashMap<String, usize> = merged
            .iter()
            .enumerate()
            .filter_map(|(index, value)| entry_id(value).map(|id| (id.to_string(), index)))
            .collect();

        let conflicts = incoming
            .iter()
            .filter(|value| entry_id(value).is_some_and(|id| positions.contains_key(id)))
            .count();

        // Nothing collides with the stored collection: append as is
        if conflicts == 0 {
            let counts = MergeCounts {
                added: incoming.len(),
                ..MergeCounts::default()
            };
            merged.extend(incoming);
            self.entries().write_all(&merged)?;
            return Ok(counts);
        }

        let replace = if let Some(replace) = replace_duplicates {
            replace
        } else if let Some(resolver) = on_duplicate_choice {
            match resolver.resolve(conflicts) {
                Ok(replace) => replace,
                Err(err) => {
                    warn!(error = %err, conflicts, "duplicate resolver failed, skipping conflicts");
                    false
                }
            }
        } else {
            false
        };

        let mut counts = MergeCounts {
            conflicts,
            ..MergeCounts::default()
        };

        for value in incoming {
            let id = entry_id(&value).unwrap_or_default().to_string();
            match positions.get(&id) {
                Some(&index) if replace => {
                    merged[index] = value;
                    counts.replaced += 1;
                }
                Some(_) => counts.skipped += 1,
                None => {
                    positions.insert(id, merged.len());
                    merged.push(value);
                    counts.added += 1;
                }
            }
        }

        self.entries().write_all(&merged)?;
        Ok(counts)
    }
}
