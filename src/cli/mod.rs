//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod categorize;
pub mod export;
pub mod goal;
pub mod import;
pub mod lock;
pub mod prefs;
pub mod report;
pub mod transaction;

pub use categorize::{handle_categorize_command, CategorizeCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::{handle_import_command, ImportArgs};
pub use lock::{handle_lock_command, LockCommands};
pub use prefs::{
    handle_categories_command, handle_prefs_command, CategoriesCommands, PrefsCommands,
};
pub use report::{handle_summary_command, SummaryArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::Datelike;

use crate::error::BudgetResult;
use crate::storage::Storage;

/// Resolve the working year: explicit flag, else the most recent ledger
/// year, else the current year
pub fn resolve_year(storage: &Storage, year: Option<i32>) -> BudgetResult<i32> {
    if let Some(year) = year {
        return Ok(year);
    }
    let years = storage.ledger.years()?;
    Ok(years
        .first()
        .copied()
        .unwrap_or_else(|| chrono::Utc::now().year()))
}
