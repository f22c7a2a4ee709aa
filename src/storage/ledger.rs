//! Ledger repository for JSON storage
//!
//! Manages the transaction ledger in ledger.json. Rows are kept in insertion
//! order; the external identifier is unique across the store and collisions
//! on insert are skipped, not overwritten.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::BudgetError;
use crate::models::{Transaction, TransactionUpdate};

use super::file_io::{read_json, write_json_atomic};

/// Serializable ledger data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct LedgerData {
    transactions: Vec<Transaction>,
}

/// Counts returned by a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows newly added to the ledger
    pub inserted: usize,
    /// Rows skipped because their external identifier already exists
    pub duplicates: usize,
}

/// Repository for transaction persistence with an external-id index
pub struct LedgerRepository {
    path: PathBuf,
    /// Rows in insertion order; this order is the tie-break for fetch_year
    data: RwLock<Vec<Transaction>>,
    /// Index: external_id -> position in `data`
    by_id: RwLock<HashMap<String, usize>>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            by_id: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: LedgerData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_id = self
            .by_id
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_id.clear();

        for txn in file_data.transactions {
            by_id.insert(txn.external_id.clone(), data.len());
            data.push(txn);
        }

        Ok(())
    }

    /// Save transactions to disk in insertion order
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = LedgerData {
            transactions: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert a batch of transactions
    ///
    /// Each row is independent: an external-id collision skips that row and
    /// the batch continues. Within-batch collisions skip the later row too.
    pub fn insert(&self, records: Vec<Transaction>) -> Result<InsertOutcome, BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_id = self
            .by_id
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut outcome = InsertOutcome::default();
        for txn in records {
            if by_id.contains_key(&txn.external_id) {
                outcome.duplicates += 1;
                continue;
            }
            by_id.insert(txn.external_id.clone(), data.len());
            data.push(txn);
            outcome.inserted += 1;
        }

        debug!(
            inserted = outcome.inserted,
            duplicates = outcome.duplicates,
            "ledger insert"
        );
        Ok(outcome)
    }

    /// Get a transaction by its external identifier
    pub fn get(&self, external_id: &str) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_id = self
            .by_id
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_id.get(external_id).map(|&i| data[i].clone()))
    }

    /// Get all transactions in insertion order
    pub fn all(&self) -> Result<Vec<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Transactions for a year, ordered by date then insertion order
    ///
    /// The stable order is what makes downstream aggregation deterministic.
    pub fn fetch_year(&self, year: i32) -> Result<Vec<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut rows: Vec<Transaction> = data.iter().filter(|t| t.year() == year).cloned().collect();
        rows.sort_by_key(|t| t.date);
        Ok(rows)
    }

    /// Distinct years present in the ledger, most recent first
    pub fn years(&self) -> Result<Vec<i32>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut years: Vec<i32> = data.iter().map(|t| t.year()).collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        Ok(years)
    }

    /// Apply a partial update to the allowed mutable fields
    ///
    /// Returns false when the id is unknown. The caller is responsible for
    /// checking the transaction's existing month against the lock set; the
    /// store does not re-derive the lock from a changed date.
    pub fn update(
        &self,
        external_id: &str,
        update: &TransactionUpdate,
    ) -> Result<bool, BudgetError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let by_id = self
            .by_id
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        match by_id.get(external_id) {
            Some(&i) => {
                update.apply(&mut data[i]);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Uncategorized, non-excluded expense rows for a year
    pub fn uncategorized_expenses(&self, year: i32) -> Result<Vec<Transaction>, BudgetError> {
        let rows = self.fetch_year(year)?;
        Ok(rows
            .into_iter()
            .filter(|t| t.counts_as_expense() && t.is_uncategorized())
            .collect())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
