//! Entry CLI commands
//!
//! Implements CLI commands for recording, listing, rating and deleting
//! prompts, plus the standalone token estimator.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Subcommand;

use crate::display::entry::{format_entry_details, format_entry_list};
use crate::error::{JournalError, JournalResult};
use crate::metadata::{detect_code, estimate_tokens, track_model, update_timestamps};
use crate::models::EntryDraft;
use crate::storage::Storage;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Estimate the token count of a prompt without saving it
    Estimate {
        /// Prompt text (reads stdin when neither text nor --file is given)
        text: Option<String>,
        /// Read the prompt from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Treat the prompt as code regardless of its content
        #[arg(long)]
        code: bool,
    },

    /// Record a new prompt
    Add {
        /// Model that the prompt was written for
        #[arg(short, long)]
        model: String,
        /// Prompt text (reads stdin when neither text nor --file is given)
        text: Option<String>,
        /// Read the prompt from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Rating to attach
        #[arg(short, long)]
        rating: Option<f64>,
        /// Short title shown in listings
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List all prompts
    List,

    /// Show a prompt's details
    Show {
        /// Prompt ID
        id: String,
    },

    /// Set a prompt's rating
    Rate {
        /// Prompt ID
        id: String,
        /// New rating
        rating: f64,
    },

    /// Delete a prompt (a backup is taken first)
    Delete {
        /// Prompt ID
        id: String,
    },
}

/// Handle an entry command
pub fn handle_entry_command(storage: &Storage, cmd: EntryCommands) -> JournalResult<()> {
    let repo = storage.entries();

    match cmd {
        EntryCommands::Estimate { text, file, code } => {
            let content = read_content(text, file)?;
            let is_code = code || detect_code(&content);
            let estimate = estimate_tokens(&content, is_code);

            println!("Estimated tokens: {}", estimate);
            println!("  Average: {}", estimate.average());
            println!("  Code:    {}", if is_code { "Yes" } else { "No" });
        }

        EntryCommands::Add {
            model,
            text,
            file,
            rating,
            title,
        } => {
            let content = read_content(text, file)?;
            let metadata = track_model(&model, &content)?;

            let mut draft = EntryDraft::from(metadata);
            draft.rating = rating;
            draft.extra.insert("content".into(), content.into());
            if let Some(title) = title {
                draft.extra.insert("title".into(), title.into());
            }

            let entry = repo.save(draft)?;

            println!("Saved prompt: {}", entry.id);
            println!("  Model:  {}", entry.model);
            println!("  Tokens: {}", entry.token_estimate);
        }

        EntryCommands::List => {
            let entries = repo.entries()?;
            print!("{}", format_entry_list(&entries));
        }

        EntryCommands::Show { id } => {
            let entry = repo
                .get(&id)?
                .ok_or_else(|| JournalError::entry_not_found(&id))?;
            print!("{}", format_entry_details(&entry));
        }

        EntryCommands::Rate { id, rating } => {
            let mut entry = repo
                .get(&id)?
                .ok_or_else(|| JournalError::entry_not_found(&id))?;
            entry.rating = Some(rating);
            let entry = repo.save(update_timestamps(&entry)?)?;

            println!("Rated {}: {}", entry.id, rating);
        }

        EntryCommands::Delete { id } => {
            let backup_key = repo.delete_by_id(&id)?;
            println!("Deleted prompt: {}", id);
            println!("Backup saved: {}", backup_key);
        }
    }

    Ok(())
}

/// Prompt text from the argument, a file, or stdin
fn read_content(text: Option<String>, file: Option<PathBuf>) -> JournalResult<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return fs::read_to_string(&path).map_err(|e| {
            JournalError::Io(format!("Failed to read {}: {}", path.display(), e))
        });
    }

    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}
