//! Statement import command

use std::fs::File;
use std::path::PathBuf;

use clap::Args;

use crate::config::ConfigRepository;
use crate::error::{BudgetError, BudgetResult};
use crate::ingest::SourceProfile;
use crate::services::{ImportOptions, ImportService};
use crate::storage::Storage;

/// Arguments for `budgetbook import`
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the statement CSV
    pub file: PathBuf,

    /// Account the statement belongs to (defaults to the first configured account)
    #[arg(short, long)]
    pub account: Option<String>,

    /// Source profile: "credit-card", "bank", or a path to a profile JSON
    #[arg(short, long, default_value = "credit-card")]
    pub profile: String,

    /// Import into locked months anyway (not recommended)
    #[arg(long)]
    pub allow_locked: bool,

    /// Skip preference-map auto-categorization
    #[arg(long)]
    pub no_auto_categorize: bool,
}

/// First configured account name
pub(crate) fn default_account(config: &ConfigRepository) -> String {
    config
        .load_accounts()
        .into_iter()
        .next()
        .unwrap_or_else(|| "Cash".to_string())
}

/// Resolve a profile flag to a source profile
fn resolve_profile(selector: &str) -> BudgetResult<SourceProfile> {
    match selector {
        "credit-card" => Ok(SourceProfile::credit_card()),
        "bank" => Ok(SourceProfile::bank()),
        path => SourceProfile::from_file(std::path::Path::new(path)),
    }
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    config: &ConfigRepository,
    args: ImportArgs,
) -> BudgetResult<()> {
    let profile = resolve_profile(&args.profile)?;
    let file = File::open(&args.file)
        .map_err(|e| BudgetError::Import(format!("Cannot open {}: {}", args.file.display(), e)))?;

    let account = args
        .account
        .unwrap_or_else(|| default_account(config));

    let service = ImportService::new(storage, config);
    let options = ImportOptions {
        allow_locked: args.allow_locked,
        auto_categorize: !args.no_auto_categorize,
    };
    let report = service.import_statement(file, profile, &account, &options)?;

    println!(
        "Parsed {} rows ({} skipped). Inserted {}, {} duplicates.",
        report.parsed, report.skipped_rows, report.inserted, report.duplicates
    );
    if report.locked_skipped > 0 {
        println!(
            "Skipped {} rows in locked months (use --allow-locked to override).",
            report.locked_skipped
        );
    }
    Ok(())
}
