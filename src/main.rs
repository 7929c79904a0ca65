use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bookstore::cli::{
    handle_audit_command, handle_backup_command, handle_book_command, handle_export_command,
    handle_import_command, BackupCommands, BookCommands, Menu,
};
use bookstore::config::{paths::BookstorePaths, settings::Settings};
use bookstore::services::CatalogService;
use bookstore::storage::Storage;

#[derive(Parser)]
#[command(
    name = "bookstore",
    version,
    about = "Bookstore catalog with automatic database snapshots",
    long_about = "BookstoreCLI keeps a catalog of books in a local SQLite database. \
                  Every change is preceded by a timestamped snapshot of the database \
                  file, and only the newest snapshots are kept."
)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Book(BookCommands),

    /// Export the catalog to CSV
    Export {
        /// Output file (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import books from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Snapshot management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Create the data directories, database and settings file
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent catalog changes
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Run the interactive menu
    Menu,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bookstore::logging::init(cli.verbose);

    // Initialize paths and settings
    let paths = BookstorePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    let catalog = CatalogService::new(&storage, &settings);

    match cli.command {
        Some(Commands::Book(cmd)) => {
            handle_book_command(&catalog, &settings, cmd)?;
        }
        Some(Commands::Export { output }) => {
            handle_export_command(&catalog, &paths, output)?;
        }
        Some(Commands::Import { file }) => {
            handle_import_command(&catalog, &file)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&catalog, &paths, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing BookstoreCLI at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Database: {}", paths.database_file().display());
            println!("Run 'bookstore add <title> <author>' to add your first book.");
        }
        Some(Commands::Config) => {
            println!("BookstoreCLI Configuration");
            println!("==========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Database:         {}", paths.database_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Max backups:     {}", settings.backup_retention.max_backups);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Audit enabled:   {}", settings.audit_enabled);
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&catalog, limit)?;
        }
        Some(Commands::Menu) | None => {
            let stdin = io::stdin();
            Menu::new(&catalog, &paths, &settings, stdin.lock(), io::stdout()).run()?;
        }
    }

    Ok(())
}
