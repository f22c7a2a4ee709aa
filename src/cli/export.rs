//! Export CLI commands

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{write_ledger_csv, write_ledger_json, write_summary_sheet};
use crate::reports::{summarize, uncategorized_row};
use crate::storage::Storage;

use super::resolve_year;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Dump one year of the ledger as CSV
    LedgerCsv {
        /// Year to export (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump one year of the ledger as JSON
    LedgerJson {
        /// Year to export (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the formatted summary sheet (Expenses / Income / Savings)
    Summary {
        /// Year to export (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Hide the Uncategorized row
        #[arg(long)]
        no_uncategorized: bool,
    },
}

fn open_output(path: Option<&Path>) -> BudgetResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Cannot create {}: {}", path.display(), e))
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    config: &ConfigRepository,
    cmd: ExportCommands,
) -> BudgetResult<()> {
    match cmd {
        ExportCommands::LedgerCsv { year, output } => {
            let year = resolve_year(storage, year)?;
            let transactions = storage.ledger.fetch_year(year)?;
            let writer = open_output(output.as_deref())?;
            write_ledger_csv(writer, &transactions)?;
        }

        ExportCommands::LedgerJson { year, output } => {
            let year = resolve_year(storage, year)?;
            let transactions = storage.ledger.fetch_year(year)?;
            let writer = open_output(output.as_deref())?;
            write_ledger_json(writer, year, &transactions)?;
        }

        ExportCommands::Summary {
            year,
            output,
            no_uncategorized,
        } => {
            let year = resolve_year(storage, year)?;
            let transactions = storage.ledger.fetch_year(year)?;
            let expense_categories = config.load_expense_categories()?;
            let income_categories = config.load_income_categories()?;

            let summary = summarize(&transactions, &expense_categories, &income_categories);
            let uncat = if no_uncategorized {
                None
            } else {
                let row = uncategorized_row(&transactions);
                (row.ytd_total != 0.0).then_some(row)
            };

            let writer = open_output(output.as_deref())?;
            write_summary_sheet(writer, year, &summary, uncat.as_ref())?;
        }
    }

    Ok(())
}
