//! Configuration module for the prompt journal
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::JournalPaths;
pub use settings::Settings;
