//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod entry;
pub mod exchange;

pub use backup::{handle_backup_command, BackupCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use exchange::{handle_exchange_command, ExchangeCommands, ExportFormat};
