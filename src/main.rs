use anyhow::Result;
use clap::{Parser, Subcommand};

use budgetbook::cli::{
    handle_categories_command, handle_categorize_command, handle_export_command,
    handle_goal_command, handle_import_command, handle_lock_command, handle_prefs_command,
    handle_summary_command, handle_transaction_command, CategoriesCommands, CategorizeCommands,
    ExportCommands, GoalCommands, ImportArgs, LockCommands, PrefsCommands, SummaryArgs,
    TransactionCommands,
};
use budgetbook::config::{BudgetPaths, ConfigRepository};
use budgetbook::logging::init_tracing;
use budgetbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budgetbook",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based personal finance ledger and monthly reporting tool",
    long_about = "BudgetBook ingests bank-statement CSV exports into a \
                  deduplicated ledger, learns description-to-category mappings, \
                  and produces month-by-month expense, income, and savings \
                  summaries from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a statement CSV into the ledger
    Import(ImportArgs),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Categorization commands
    #[command(subcommand, alias = "cat")]
    Categorize(CategorizeCommands),

    /// Month-lock commands (statement close)
    #[command(subcommand)]
    Lock(LockCommands),

    /// Goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Show the monthly summary tables
    Summary(SummaryArgs),

    /// Export commands
    #[command(subcommand)]
    Export(ExportCommands),

    /// Category-list commands
    #[command(subcommand)]
    Categories(CategoriesCommands),

    /// Preference-map commands
    #[command(subcommand)]
    Prefs(PrefsCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // Initialize paths and storage
    let paths = BudgetPaths::new()?;
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    let config = ConfigRepository::new(paths.clone());

    match cli.command {
        Commands::Import(args) => {
            handle_import_command(&storage, &config, args)?;
        }
        Commands::Transaction(cmd) => {
            handle_transaction_command(&storage, &config, cmd)?;
        }
        Commands::Categorize(cmd) => {
            handle_categorize_command(&storage, &config, cmd)?;
        }
        Commands::Lock(cmd) => {
            handle_lock_command(&storage, &config, cmd)?;
        }
        Commands::Goal(cmd) => {
            handle_goal_command(&storage, &config, cmd)?;
        }
        Commands::Summary(args) => {
            handle_summary_command(&storage, &config, args)?;
        }
        Commands::Export(cmd) => {
            handle_export_command(&storage, &config, cmd)?;
        }
        Commands::Categories(cmd) => {
            handle_categories_command(&storage, &config, cmd)?;
        }
        Commands::Prefs(cmd) => {
            handle_prefs_command(&storage, &config, cmd)?;
        }
        Commands::Init => {
            storage.save_all()?;
            println!("Initialized BudgetBook data in {}", paths.base_dir().display());
        }
        Commands::Config => {
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Ledger file:     {}", paths.ledger_file().display());
            println!("Locks file:      {}", paths.locks_file().display());
            println!("Goals file:      {}", paths.goals_file().display());
            println!("Preferences:     {}", paths.preferences_file().display());
            println!("Initialized:     {}", paths.is_initialized());
        }
    }

    Ok(())
}
