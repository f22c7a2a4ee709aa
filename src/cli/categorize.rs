//! Categorization CLI commands

use clap::Subcommand;

use crate::config::ConfigRepository;
use crate::display;
use crate::error::BudgetResult;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::resolve_year;

/// Categorization subcommands
#[derive(Subcommand)]
pub enum CategorizeCommands {
    /// Record a description→category mapping and apply it retroactively
    Map {
        /// Statement description (exact string)
        description: String,
        /// Category to assign
        category: String,
        /// Year to apply to (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
        /// Also apply to similar variants (best-effort; may conflate merchants)
        #[arg(long)]
        apply_similar: bool,
    },

    /// Suggest a category for a description
    Suggest {
        /// Statement description
        description: String,
    },

    /// List uncategorized expense descriptions for a year
    Pending {
        /// Year to inspect (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a categorize command
pub fn handle_categorize_command(
    storage: &Storage,
    config: &ConfigRepository,
    cmd: CategorizeCommands,
) -> BudgetResult<()> {
    let service = CategoryService::new(storage, config);

    match cmd {
        CategorizeCommands::Map {
            description,
            category,
            year,
            apply_similar,
        } => {
            let year = resolve_year(storage, year)?;
            let outcome = service.record_mapping(&description, &category, year, apply_similar)?;

            println!(
                "Mapped {:?} -> {:?}. Recategorized {} transactions.",
                description, category, outcome.recategorized
            );
            if outcome.locked_skipped > 0 {
                println!("Skipped {} rows in locked months.", outcome.locked_skipped);
            }
            if apply_similar {
                println!(
                    "Also mapped {} similar descriptions.",
                    outcome.similar_descriptions
                );
            }
        }

        CategorizeCommands::Suggest { description } => match service.suggest(&description)? {
            Some(category) => println!("{}", category),
            None => println!("No suggestion."),
        },

        CategorizeCommands::Pending { year } => {
            let year = resolve_year(storage, year)?;
            let pending = service.pending(year)?;
            if pending.is_empty() {
                println!("Nothing to categorize for {}.", year);
            } else {
                print!("{}", display::render_pending(&pending));
            }
        }
    }

    Ok(())
}
