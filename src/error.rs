//! Custom error types for the prompt journal
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for journal operations
#[derive(Error, Debug)]
pub enum JournalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed entry or export document. Never partially applied.
    #[error("Shape error: {0}")]
    Shape(String),

    /// Import document written by an incompatible exporter
    #[error("Unsupported export version: {found}. Expected {expected}")]
    UnsupportedVersion { found: String, expected: String },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The stored collection could not be parsed as an array
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    /// Underlying key-value store failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export delivery errors
    #[error("Export error: {0}")]
    Export(String),
}

impl JournalError {
    /// Create a "not found" error for journal entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a shape (validation) error
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape(_))
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for journal operations
pub type JournalResult<T> = Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JournalError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = JournalError::entry_not_found("p_123");
        assert_eq!(err.to_string(), "Entry not found: p_123");
        assert!(err.is_not_found());
        assert!(!err.is_shape());
    }

    #[test]
    fn test_unsupported_version_error() {
        let err = JournalError::UnsupportedVersion {
            found: "0.9.0".into(),
            expected: "1.0.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported export version: 0.9.0. Expected 1.0.0"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let journal_err: JournalError = io_err.into();
        assert!(matches!(journal_err, JournalError::Io(_)));
    }
}
