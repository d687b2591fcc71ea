use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompt_journal::cli::{
    handle_backup_command, handle_entry_command, handle_exchange_command, BackupCommands,
    EntryCommands, ExchangeCommands,
};
use prompt_journal::config::{paths::JournalPaths, settings::Settings};
use prompt_journal::storage::Storage;

#[derive(Parser)]
#[command(
    name = "journal",
    author = "Kaylee Beyene",
    version,
    about = "Keep a journal of the prompts you send to language models",
    long_about = "A local journal for LLM prompts. Records the model, timestamps and a \
                  token estimate for every prompt, and supports export, import and \
                  snapshot backups of the whole collection."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Entry(EntryCommands),

    #[command(flatten)]
    Exchange(ExchangeCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Initialize the journal's data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    // Initialize paths and settings
    let paths = JournalPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing prompt journal at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Record your first prompt with: journal add --model <MODEL> \"<PROMPT>\"");
        }
        Some(Commands::Config) => {
            println!("Prompt Journal Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Store directory:  {}", paths.store_dir().display());
            println!("Export directory: {}", settings.export_dir(&paths).display());
            println!("Initialized:      {}", if paths.is_initialized() { "Yes" } else { "No" });
            println!();
            println!("Settings:");
            println!("  Pretty export: {}", settings.pretty_export);
            match settings.backup_keep {
                Some(keep) => println!("  Backup keep:   {}", keep),
                None => println!("  Backup keep:   (not set)"),
            }
        }
        Some(command) => {
            let storage = Storage::open(&paths)?;
            match command {
                Commands::Entry(cmd) => handle_entry_command(&storage, cmd)?,
                Commands::Exchange(cmd) => {
                    handle_exchange_command(&storage, &paths, &settings, cmd)?
                }
                Commands::Backup(cmd) => handle_backup_command(&storage, &settings, cmd)?,
                Commands::Init | Commands::Config => {}
            }
        }
        None => {
            println!("Prompt Journal - track the prompts you write");
            println!();
            println!("Run 'journal --help' for usage information.");
        }
    }

    Ok(())
}
