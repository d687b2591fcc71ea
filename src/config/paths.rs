//! Path management for the prompt journal
//!
//! Provides XDG-compliant path resolution for configuration, the key-value
//! store directory, and exports.
//!
//! ## Path Resolution Order
//!
//! 1. `PROMPT_JOURNAL_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/prompt-journal` or `~/.config/prompt-journal`
//! 3. Windows: `%APPDATA%\prompt-journal`

use std::path::PathBuf;

use crate::error::JournalError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PROMPT_JOURNAL_DATA_DIR";

/// Manages all paths used by the journal
#[derive(Debug, Clone)]
pub struct JournalPaths {
    /// Base directory for all journal data
    base_dir: PathBuf,
}

impl JournalPaths {
    /// Create a new JournalPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, JournalError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create JournalPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/prompt-journal/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one file per store key
    pub fn store_dir(&self) -> PathBuf {
        self.base_dir.join("store")
    }

    /// Default directory for exported documents
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), JournalError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| JournalError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.store_dir())
            .map_err(|e| JournalError::Io(format!("Failed to create store directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| JournalError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if the journal has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, JournalError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("prompt-journal"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| JournalError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("prompt-journal"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, JournalError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| JournalError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("prompt-journal"))
}
