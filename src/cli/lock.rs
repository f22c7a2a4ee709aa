//! Month-lock CLI commands (statement close)

use std::collections::BTreeSet;

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::error::BudgetResult;
use crate::storage::Storage;

use super::resolve_year;

/// Month-lock subcommands
#[derive(Subcommand)]
pub enum LockCommands {
    /// Replace the locked-month set for a year
    Set {
        /// Year to lock months in
        year: i32,
        /// Months to lock (1-12); pass none to unlock everything
        months: Vec<u32>,
    },

    /// Show locked months for a year
    Show {
        /// Year to query (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a lock command
pub fn handle_lock_command(
    storage: &Storage,
    _config: &ConfigRepository,
    cmd: LockCommands,
) -> BudgetResult<()> {
    match cmd {
        LockCommands::Set { year, months } => {
            let months: BTreeSet<u32> = months.into_iter().collect();
            storage.locks.set_locked_months(year, months.clone())?;
            storage.locks.save()?;

            if months.is_empty() {
                println!("All months of {} unlocked.", year);
            } else {
                let listed: Vec<String> = months.iter().map(|m| format!("{:02}", m)).collect();
                println!("Locked months for {}: {}", year, listed.join(", "));
            }
        }

        LockCommands::Show { year } => {
            let year = resolve_year(storage, year)?;
            let months = storage.locks.locked_months(year)?;
            if months.is_empty() {
                println!("No locked months for {}.", year);
            } else {
                let listed: Vec<String> = months.iter().map(|m| format!("{:02}", m)).collect();
                println!("Locked months for {}: {}", year, listed.join(", "));
            }
        }
    }

    Ok(())
}
