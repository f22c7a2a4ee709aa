//! Goal CLI commands

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;
use crate::reports::GoalReport;
use crate::storage::Storage;

use super::resolve_year;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Set the monthly target for a category
    Set {
        /// Year the goal applies to
        year: i32,
        /// Expense category
        category: String,
        /// Monthly target amount (e.g., "400" or "400.00")
        amount: String,
    },

    /// Show goal progress over a month range
    Report {
        /// Year to report on (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// First month of the range (1-12)
        #[arg(long, default_value_t = 1)]
        from: u32,
        /// Last month of the range (1-12)
        #[arg(long, default_value_t = 12)]
        to: u32,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    config: &ConfigRepository,
    cmd: GoalCommands,
) -> BudgetResult<()> {
    match cmd {
        GoalCommands::Set {
            year,
            category,
            amount,
        } => {
            let amount = Money::parse(&amount)
                .map_err(|e| BudgetError::Validation(e.to_string()))?;
            storage.goals.upsert_goal(year, &category, amount)?;
            storage.goals.save()?;
            println!("Goal for {:?} in {}: {} per month.", category, year, amount);
        }

        GoalCommands::Report { year, from, to } => {
            if !(1..=12).contains(&from) || !(1..=12).contains(&to) || from > to {
                return Err(BudgetError::Validation(format!(
                    "Invalid month range: {}..{}",
                    from, to
                )));
            }

            let year = resolve_year(storage, year)?;
            let goals = storage.goals.goals_for_year(year)?;
            let transactions = storage.ledger.fetch_year(year)?;
            let categories = config.load_expense_categories()?;
            let months: Vec<u32> = (from..=to).collect();

            let report = GoalReport::generate(&goals, &transactions, &categories, &months);
            if report.rows.is_empty() {
                println!("No expense categories configured.");
            } else {
                print!("{}", display::render_goals(&report));
            }
        }
    }

    Ok(())
}
