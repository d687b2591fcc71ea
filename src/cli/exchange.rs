//! CLI commands for export and import

use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::config::paths::JournalPaths;
use crate::config::settings::Settings;
use crate::error::{JournalError, JournalResult};
use crate::export::{export_entries_csv, FilePresenter, Presenter, StdoutPresenter};
use crate::models::Timestamp;
use crate::services::ImportOptions;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Versioned JSON document (importable)
    Json,
    /// One row per prompt, for spreadsheets
    Csv,
}

/// Export and import subcommands
#[derive(Subcommand, Debug)]
pub enum ExchangeCommands {
    /// Export all prompts to a file
    Export {
        /// Output file path, or '-' for stdout (defaults to a timestamped file in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Import prompts from an exported JSON file
    Import {
        /// File written by `journal export`
        file: PathBuf,

        /// Replace the whole collection instead of merging
        #[arg(long)]
        replace_all: bool,

        /// Overwrite existing prompts that share an ID
        #[arg(long, conflicts_with = "skip_duplicates")]
        replace_duplicates: bool,

        /// Keep existing prompts that share an ID
        #[arg(long)]
        skip_duplicates: bool,
    },
}

/// Handle export and import commands
pub fn handle_exchange_command(
    storage: &Storage,
    paths: &JournalPaths,
    settings: &Settings,
    cmd: ExchangeCommands,
) -> JournalResult<()> {
    match cmd {
        ExchangeCommands::Export {
            output,
            format,
            compact,
        } => match format {
            ExportFormat::Json => {
                let pretty = settings.pretty_export && !compact;
                let document = storage.exchange().export()?;

                if output.as_deref() == Some(Path::new("-")) {
                    return StdoutPresenter { pretty }.present(&document);
                }

                let presenter = match output {
                    Some(path) => FilePresenter::to_file(path, pretty),
                    None => FilePresenter::into_dir(settings.export_dir(paths), pretty),
                };
                let path = presenter.present(&document)?;
                println!(
                    "Exported {} prompt(s) to: {}",
                    document.stats.total_prompts,
                    path.display()
                );
            }
            ExportFormat::Csv => {
                if output.as_deref() == Some(Path::new("-")) {
                    let entries = storage.entries().entries()?;
                    return export_entries_csv(&entries, io::stdout().lock());
                }

                let path = output.unwrap_or_else(|| {
                    settings.export_dir(paths).join(format!(
                        "prompt-journal-export-{}.csv",
                        Timestamp::now().file_safe()
                    ))
                });
                let entries = storage.entries().entries()?;

                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let file = File::create(&path).map_err(|e| {
                    JournalError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                export_entries_csv(&entries, BufWriter::new(file))?;

                println!("Exported {} prompt(s) to: {}", entries.len(), path.display());
                println!("Note: CSV is a summary. Use JSON for a file you can import.");
            }
        },

        ExchangeCommands::Import {
            file,
            replace_all,
            replace_duplicates,
            skip_duplicates,
        } => {
            let text = fs::read_to_string(&file).map_err(|e| {
                JournalError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let mut ask = |conflicts: usize| -> JournalResult<bool> { confirm_replace(conflicts) };

            let mut options = if replace_all {
                ImportOptions::replace_all()
            } else {
                ImportOptions::merge()
            };
            if replace_duplicates {
                options = options.with_replace_duplicates(true);
            } else if skip_duplicates {
                options = options.with_replace_duplicates(false);
            } else {
                options = options.with_resolver(&mut ask);
            }

            let summary = storage.exchange().import_str(&text, options)?;

            println!("Import complete.");
            println!("  Added:    {}", summary.added);
            if summary.conflicts > 0 {
                println!("  Replaced: {}", summary.replaced);
                println!("  Skipped:  {}", summary.skipped);
            }
            println!("Backup saved: {}", summary.backup_key);
        }
    }

    Ok(())
}

/// Ask on the terminal whether conflicting prompts should be replaced
fn confirm_replace(conflicts: usize) -> JournalResult<bool> {
    print!(
        "{} prompt(s) already exist with the same ID. Replace them? [y/N] ",
        conflicts
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
