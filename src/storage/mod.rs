//! Storage layer for BudgetBook
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. One repository per concern: the transaction ledger, the
//! locked-month sets, and the per-category monthly goals.

pub mod file_io;
pub mod goals;
pub mod ledger;
pub mod locks;

pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use ledger::{InsertOutcome, LedgerRepository};
pub use locks::LockRepository;

use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    pub ledger: LedgerRepository,
    pub locks: LockRepository,
    pub goals: GoalRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            ledger: LedgerRepository::new(paths.ledger_file()),
            locks: LockRepository::new(paths.locks_file()),
            goals: GoalRepository::new(paths.goals_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BudgetError> {
        self.ledger.load()?;
        self.locks.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BudgetError> {
        self.ledger.save()?;
        self.locks.save()?;
        self.goals.save()?;
        Ok(())
    }
}
