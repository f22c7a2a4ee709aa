//! Summary report command

use clap::Args;

use crate::config::ConfigRepository;
use crate::display;
use crate::error::BudgetResult;
use crate::reports::{summarize, uncategorized_row};
use crate::storage::Storage;

use super::resolve_year;

/// Arguments for `budgetbook summary`
#[derive(Args)]
pub struct SummaryArgs {
    /// Year to summarize (defaults to the most recent)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Hide the Uncategorized row
    #[arg(long)]
    pub no_uncategorized: bool,

    /// Sort expense categories alphabetically instead of list order
    #[arg(long)]
    pub sort_alpha: bool,
}

/// Handle the summary command
pub fn handle_summary_command(
    storage: &Storage,
    config: &ConfigRepository,
    args: SummaryArgs,
) -> BudgetResult<()> {
    let year = resolve_year(storage, args.year)?;
    let transactions = storage.ledger.fetch_year(year)?;
    if transactions.is_empty() {
        println!("No data for {} yet. Run `budgetbook import` first.", year);
        return Ok(());
    }

    let mut expense_categories = config.load_expense_categories()?;
    if args.sort_alpha {
        expense_categories.sort();
    }
    let income_categories = config.load_income_categories()?;

    let summary = summarize(&transactions, &expense_categories, &income_categories);

    let extra = if args.no_uncategorized {
        Vec::new()
    } else {
        let row = uncategorized_row(&transactions);
        if row.ytd_total != 0.0 {
            vec![row]
        } else {
            Vec::new()
        }
    };

    println!("Summary for {}", year);
    println!();
    println!("Expenses");
    print!("{}", display::render_summary_table(&summary.expenses, &extra));
    println!();
    println!("Income");
    print!("{}", display::render_summary_table(&summary.income, &[]));
    println!();
    println!("Savings");
    print!("{}", display::render_savings(&summary.savings));
    println!();
    println!(
        "Savings Rate (YTD): {}",
        display::format_percent(summary.savings.ytd_rate)
    );

    Ok(())
}
