//! Transaction CLI commands
//!
//! Manual entry, listing, and field edits. Edits go through the service
//! layer so the locked-month guard always applies.

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::ingest::parser::parse_date;
use crate::models::{Money, TransactionUpdate, TxnKind};
use crate::services::{LedgerService, ManualEntry};
use crate::storage::Storage;

use super::resolve_year;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a manual transaction
    Add {
        /// Transaction date (YYYY-MM-DD or MM/DD/YYYY)
        date: String,
        /// Description / source
        description: String,
        /// Amount as a positive figure (e.g., "12.34")
        amount: String,
        /// "expense" or "income"
        #[arg(short, long, default_value = "expense")]
        kind: TxnKind,
        /// Account name (defaults to the first configured account)
        #[arg(short, long)]
        account: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Exclude from totals (transfer/payment)
        #[arg(long)]
        excluded: bool,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List transactions for a year
    List {
        /// Year to list (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// Only uncategorized expense rows
        #[arg(long)]
        uncategorized: bool,
    },

    /// Edit fields of a transaction
    Edit {
        /// External identifier of the transaction
        id: String,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New signed amount (e.g., "-12.34")
        #[arg(long)]
        amount: Option<String>,
        /// New kind ("expense" or "income")
        #[arg(long)]
        kind: Option<TxnKind>,
        /// New account
        #[arg(long)]
        account: Option<String>,
        /// New category (empty string clears it)
        #[arg(long)]
        category: Option<String>,
        /// Set or clear the excluded flag
        #[arg(long)]
        excluded: Option<bool>,
        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,
    },
}

impl clap::ValueEnum for TxnKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[TxnKind::Expense, TxnKind::Income]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    config: &ConfigRepository,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let service = LedgerService::new(storage);

    match cmd {
        TransactionCommands::Add {
            date,
            description,
            amount,
            kind,
            account,
            category,
            excluded,
            notes,
        } => {
            let date = parse_date(&date)
                .ok_or_else(|| BudgetError::Validation(format!("Invalid date: {}", date)))?;
            let amount = Money::parse(&amount)
                .map_err(|e| BudgetError::Validation(e.to_string()))?;
            let account = account.unwrap_or_else(|| super::import::default_account(config));

            let outcome = service.add_manual(ManualEntry {
                date,
                description,
                amount,
                kind,
                account,
                category,
                excluded,
                notes,
            })?;

            if outcome.locked_skipped > 0 {
                println!("Nothing added: that month is locked.");
            } else if outcome.changed == 0 {
                println!("Nothing added: identical transaction already present.");
            } else {
                println!("Added.");
            }
        }

        TransactionCommands::List { year, uncategorized } => {
            let year = resolve_year(storage, year)?;
            let rows = if uncategorized {
                storage.ledger.uncategorized_expenses(year)?
            } else {
                storage.ledger.fetch_year(year)?
            };
            if rows.is_empty() {
                println!("No transactions for {}.", year);
            } else {
                print!("{}", display::render_transactions(&rows));
            }
        }

        TransactionCommands::Edit {
            id,
            date,
            description,
            amount,
            kind,
            account,
            category,
            excluded,
            notes,
        } => {
            let date = match date {
                Some(raw) => Some(parse_date(&raw).ok_or_else(|| {
                    BudgetError::Validation(format!("Invalid date: {}", raw))
                })?),
                None => None,
            };
            let amount = match amount {
                Some(raw) => Some(
                    Money::parse(&raw).map_err(|e| BudgetError::Validation(e.to_string()))?,
                ),
                None => None,
            };

            let update = TransactionUpdate {
                date,
                posted_date: None,
                description,
                amount,
                kind,
                account,
                category: category.map(|c| if c.is_empty() { None } else { Some(c) }),
                excluded,
                notes: notes.map(|n| if n.is_empty() { None } else { Some(n) }),
            };

            let outcome = service.edit(&id, &update)?;
            if outcome.locked_skipped > 0 {
                println!("No changes: that month is locked.");
            } else if outcome.changed == 0 {
                println!("No changes.");
            } else {
                println!("Updated {}.", id);
            }
        }
    }

    Ok(())
}
