//! File-backed key-value store with atomic writes
//!
//! Each key lives in its own file inside the store directory. Keys are
//! percent-encoded so characters like `:` in backup timestamps survive on
//! every platform, and writes go through a temp file + rename so a value is
//! either completely written or not modified at all.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{JournalError, JournalResult};

use super::KeyValueStore;

/// Characters that are unsafe (or ambiguous) in file names
const KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'*')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'|');

const VALUE_EXTENSION: &str = ".val";
const TEMP_EXTENSION: &str = ".tmp";

/// Store that keeps one file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> JournalResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            JournalError::Storage(format!(
                "Failed to create store directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Directory the store writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let encoded = utf8_percent_encode(key, KEY_ENCODE_SET).to_string();
        self.dir.join(format!("{}{}", encoded, VALUE_EXTENSION))
    }
}

fn decode_key(file_name: &str) -> Option<String> {
    let encoded = file_name.strip_suffix(VALUE_EXTENSION)?;
    let decoded = percent_decode_str(encoded).decode_utf8().ok()?;
    Some(match decoded {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    })
}

/// Write `value` to `path` and sync it to disk
fn write_synced(path: &Path, value: &str) -> JournalResult<()> {
    let file = File::create(path)
        .map_err(|e| JournalError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(value.as_bytes())
        .map_err(|e| JournalError::Storage(format!("Failed to write value: {}", e)))?;

    writer
        .flush()
        .map_err(|e| JournalError::Storage(format!("Failed to flush value: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| JournalError::Storage(format!("Failed to sync value: {}", e)))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> JournalResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some).map_err(|e| {
            JournalError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })
    }

    fn set(&self, key: &str, value: &str) -> JournalResult<()> {
        let path = self.path_for(key);
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(TEMP_EXTENSION);
        let temp_path = PathBuf::from(temp_name);

        if let Err(e) = write_synced(&temp_path, value) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            JournalError::Storage(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> JournalResult<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        fs::remove_file(&path).map_err(|e| {
            JournalError::Storage(format!("Failed to remove {}: {}", path.display(), e))
        })
    }

    fn keys(&self) -> JournalResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| {
            JournalError::Storage(format!("Failed to read store directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                JournalError::Storage(format!("Failed to read directory entry: {}", e))
            })?;

            let file_name = entry.file_name();
            if let Some(key) = file_name.to_str().and_then(decode_key) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("store")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let (_temp, store) = create_test_store();

        store.set("promptJournal.prompts", "[]").unwrap();
        assert_eq!(
            store.get("promptJournal.prompts").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_keys_round_trip_special_characters() {
        let (_temp, store) = create_test_store();
        let key = "promptJournal.backup.2025-01-15T10:30:00.123Z";

        store.set(key, "[]").unwrap();

        assert_eq!(store.keys().unwrap(), vec![key.to_string()]);
        assert!(store.path_for(key).exists());
        assert!(!store.path_for(key).to_string_lossy().contains(':'));
    }

    #[test]
    fn test_no_temp_file_left() {
        let (_temp, store) = create_test_store();
        store.set("k", "v").unwrap();

        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.val".to_string()]);
    }

    #[test]
    fn test_failed_set_leaves_no_temp_file() {
        let (_temp, store) = create_test_store();

        // A directory in the value's place makes the rename fail
        fs::create_dir(store.path_for("k")).unwrap();
        fs::write(store.path_for("k").join("inner"), "x").unwrap();

        assert!(store.set("k", "v").is_err());
        let mut temp_name = store.path_for("k").into_os_string();
        temp_name.push(TEMP_EXTENSION);
        assert!(!PathBuf::from(temp_name).exists());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (_temp, store) = create_test_store();
        store.remove("absent").unwrap();

        store.set("present", "1").unwrap();
        store.remove("present").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_files_ignored() {
        let (_temp, store) = create_test_store();
        fs::write(store.dir().join("notes.txt"), "hello").unwrap();
        store.set("k", "v").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
    }
}
