//! Month-lock repository
//!
//! Persists the per-year sets of locked months in locked_months.json. A
//! locked month marks a closed statement period: enforcement happens at the
//! mutation entry points (import, categorization, edits), not here.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;

use super::file_io::{read_json, write_json_atomic};

/// Repository for locked-month persistence
pub struct LockRepository {
    path: PathBuf,
    /// year -> months (1..=12)
    data: RwLock<BTreeMap<i32, BTreeSet<u32>>>,
}

impl LockRepository {
    /// Create a new lock repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load locked months from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BTreeMap<i32, BTreeSet<u32>> = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;
        Ok(())
    }

    /// Save locked months to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        write_json_atomic(&self.path, &*data)
    }

    /// Replace the locked-month set for a year
    ///
    /// Months outside 1..=12 are rejected.
    pub fn set_locked_months(&self, year: i32, months: BTreeSet<u32>) -> Result<(), BudgetError> {
        if let Some(&bad) = months.iter().find(|&&m| !(1..=12).contains(&m)) {
            return Err(BudgetError::Validation(format!(
                "month out of range: {}",
                bad
            )));
        }

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        if months.is_empty() {
            data.remove(&year);
        } else {
            data.insert(year, months);
        }
        Ok(())
    }

    /// Locked months for a year (empty set when none)
    pub fn locked_months(&self, year: i32) -> Result<BTreeSet<u32>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&year).cloned().unwrap_or_default())
    }

    /// Whether a specific (year, month) is locked
    pub fn is_locked(&self, year: i32, month: u32) -> Result<bool, BudgetError> {
        Ok(self.locked_months(year)?.contains(&month))
    }
}
