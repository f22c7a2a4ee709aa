//! Category-list and preference-map CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::error::{BudgetError, BudgetResult};
use crate::storage::Storage;

/// Category-list subcommands
#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Show the configured expense and income category lists
    Show,

    /// Replace the expense-category list (order defines report rows)
    SetExpense {
        /// Category names in display order
        names: Vec<String>,
    },

    /// Replace the income-category list
    SetIncome {
        /// Category names in display order
        names: Vec<String>,
    },
}

/// Preference-map subcommands
#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show the stored description→category mapping
    Show,

    /// Replace the mapping from a JSON object file
    Import {
        /// Path to a preferences.json
        file: PathBuf,
    },

    /// Write the mapping to a JSON file
    Export {
        /// Output file
        output: PathBuf,
    },
}

/// Handle a categories command
pub fn handle_categories_command(
    _storage: &Storage,
    config: &ConfigRepository,
    cmd: CategoriesCommands,
) -> BudgetResult<()> {
    match cmd {
        CategoriesCommands::Show => {
            let expense = config.load_expense_categories()?;
            let income = config.load_income_categories()?;

            println!("Expense categories ({}):", expense.len());
            for name in &expense {
                println!("  {}", name);
            }
            println!("Income categories ({}):", income.len());
            for name in &income {
                println!("  {}", name);
            }
        }

        CategoriesCommands::SetExpense { names } => {
            let names: Vec<String> = names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
            config.save_expense_categories(&names)?;
            println!("Saved {} expense categories.", names.len());
        }

        CategoriesCommands::SetIncome { names } => {
            let names: Vec<String> = names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
            config.save_income_categories(&names)?;
            println!("Saved {} income categories.", names.len());
        }
    }

    Ok(())
}

/// Handle a prefs command
pub fn handle_prefs_command(
    _storage: &Storage,
    config: &ConfigRepository,
    cmd: PrefsCommands,
) -> BudgetResult<()> {
    match cmd {
        PrefsCommands::Show => {
            let prefs = config.load_preferences()?;
            if prefs.is_empty() {
                println!("No preferences stored.");
            } else {
                for (description, category) in &prefs {
                    println!("{:?} -> {:?}", description, category);
                }
                println!("{} mappings.", prefs.len());
            }
        }

        PrefsCommands::Import { file } => {
            let text = std::fs::read_to_string(&file).map_err(|e| {
                BudgetError::Io(format!("Cannot read {}: {}", file.display(), e))
            })?;
            let count = config.import_preferences(&text)?;
            println!("Loaded mapping with {} entries.", count);
        }

        PrefsCommands::Export { output } => {
            let prefs = config.load_preferences()?;
            let json = serde_json::to_string_pretty(&prefs)?;
            std::fs::write(&output, json + "\n").map_err(|e| {
                BudgetError::Io(format!("Cannot write {}: {}", output.display(), e))
            })?;
            println!("Wrote {} mappings to {}.", prefs.len(), output.display());
        }
    }

    Ok(())
}
