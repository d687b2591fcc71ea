//! User settings for the prompt journal
//!
//! Manages export preferences and the optional backup retention count.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::JournalPaths;
use crate::error::JournalError;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Pretty-print exported JSON documents
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,

    /// Where exported files are written; the journal's `exports/` dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Number of backups `backup prune` keeps when no explicit count is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_keep: Option<u32>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pretty_export() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pretty_export: default_pretty_export(),
            export_dir: None,
            backup_keep: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &JournalPaths) -> Result<Self, JournalError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - `init` decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| JournalError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| JournalError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &JournalPaths) -> Result<(), JournalError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| JournalError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| JournalError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Resolve the directory exports are written to
    pub fn export_dir(&self, paths: &JournalPaths) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| paths.export_dir())
    }
}
