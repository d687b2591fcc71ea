//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::settings::Settings;
use crate::display::backup::format_backup_list;
use crate::error::{JournalError, JournalResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the current collection
    Create,

    /// List all available backups
    List,

    /// Restore the collection from a backup
    Restore {
        /// Backup key (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup key
        backup: String,
    },

    /// Delete all but the newest backups
    Prune {
        /// Number of backups to keep (defaults to the `backup_keep` setting)
        #[arg(short, long)]
        keep: Option<usize>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> JournalResult<()> {
    let manager = storage.backups();

    match cmd {
        BackupCommands::Create => {
            let key = manager.create()?;
            println!("Backup created: {}", key);
        }

        BackupCommands::List => {
            let backups = manager.list()?;
            print!("{}", format_backup_list(&backups));
        }

        BackupCommands::Restore { backup, force } => {
            let key = resolve_backup_key(&manager, &backup)?;
            let content = manager.read(&key)?;

            println!("Backup: {}", key);
            println!("Size:   {} bytes", content.len());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current prompts!");
                println!("To proceed, run again with --force flag:");
                println!("  journal backup restore {} --force", backup);
                return Ok(());
            }

            // Snapshot current data so the restore itself can be undone
            let pre_restore = manager.create()?;
            println!("Pre-restore backup saved: {}", pre_restore);

            manager.restore(&key)?;
            println!("Restore complete.");
        }

        BackupCommands::Delete { backup } => {
            let key = resolve_backup_key(&manager, &backup)?;
            manager.delete(&key)?;
            println!("Deleted backup: {}", key);
        }

        BackupCommands::Prune { keep, force } => {
            let keep = match keep.or(settings.backup_keep.map(|k| k as usize)) {
                Some(keep) => keep,
                None => {
                    return Err(JournalError::Config(
                        "No retention count given. Pass --keep N or set backup_keep in config.json"
                            .into(),
                    ))
                }
            };

            let backups = manager.list()?;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!("You have {} backup(s); keeping {}.", backups.len(), keep);
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Current backups: {}", backups.len());
            println!("To be deleted:   {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  journal backup prune --keep {} --force", keep);
                return Ok(());
            }

            let deleted = manager.prune(keep)?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full store key
///
/// Accepts `latest`, a full key, or just the timestamp suffix.
fn resolve_backup_key(manager: &BackupManager, backup: &str) -> JournalResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest()?
            .map(|b| b.key)
            .ok_or_else(|| JournalError::backup_not_found("latest"));
    }

    let backups = manager.list()?;
    backups
        .into_iter()
        .find(|b| b.key == backup || b.timestamp == backup)
        .map(|b| b.key)
        .ok_or_else(|| JournalError::backup_not_found(backup))
}
