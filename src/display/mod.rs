//! Display formatting for terminal output
//!
//! Formats entries and backups for the CLI.

pub mod backup;
pub mod entry;

pub use backup::{format_backup_list, format_duration};
pub use entry::{format_entry_details, format_entry_list};
