//! Manual ledger operations
//!
//! Manual transaction entry and field edits, with the locked-month guard
//! applied before anything is written. The guard uses the transaction's
//! existing month; a lock check against a changed date is the caller's
//! responsibility.

use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::ingest::identity;
use crate::ingest::CandidateTransaction;
use crate::models::{Money, TransactionUpdate, TxnKind};
use crate::storage::Storage;

/// A manual transaction entry
///
/// The amount is the positive figure the user typed; the sign is derived
/// from the kind.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub kind: TxnKind,
    pub account: String,
    pub category: Option<String>,
    pub excluded: bool,
    pub notes: Option<String>,
}

/// Counts describing a manual add
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Rows actually changed or inserted
    pub changed: usize,
    /// Rows withheld because their month is locked
    pub locked_skipped: usize,
}

/// Service for manual ledger mutations
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add one manually entered transaction
    ///
    /// Locked months are skipped and reported, never written.
    pub fn add_manual(&self, entry: ManualEntry) -> BudgetResult<EditOutcome> {
        if entry.description.trim().is_empty() {
            return Err(BudgetError::Validation("Description required".into()));
        }

        let year = entry.date.year();
        let month = entry.date.month();
        if self.storage.locks.is_locked(year, month)? {
            info!(year, month, "manual entry withheld: month locked");
            return Ok(EditOutcome {
                changed: 0,
                locked_skipped: 1,
            });
        }

        let signed = match entry.kind {
            TxnKind::Expense => -entry.amount.abs(),
            TxnKind::Income => entry.amount.abs(),
        };

        let candidate = CandidateTransaction {
            date: entry.date,
            posted_date: None,
            description: entry.description.trim().to_string(),
            amount: signed,
            kind: entry.kind,
            account: entry.account,
            category: entry.category.filter(|c| !c.is_empty()),
            excluded: entry.excluded,
            notes: entry.notes.filter(|n| !n.is_empty()),
        };

        let transactions = identity::into_transactions(vec![candidate], Utc::now());
        let outcome = self.storage.ledger.insert(transactions)?;
        self.storage.ledger.save()?;

        Ok(EditOutcome {
            changed: outcome.inserted,
            locked_skipped: 0,
        })
    }

    /// Edit the mutable fields of one transaction
    ///
    /// A transaction in a locked month is left untouched and reported as a
    /// zero-change outcome with the skip counted.
    pub fn edit(
        &self,
        external_id: &str,
        update: &TransactionUpdate,
    ) -> BudgetResult<EditOutcome> {
        let existing = self
            .storage
            .ledger
            .get(external_id)?
            .ok_or_else(|| BudgetError::transaction_not_found(external_id))?;

        // Lock check against the transaction's existing month.
        if self
            .storage
            .locks
            .is_locked(existing.year(), existing.month())?
        {
            info!(external_id, "edit withheld: month locked");
            return Ok(EditOutcome {
                changed: 0,
                locked_skipped: 1,
            });
        }

        let changed = self.storage.ledger.update(external_id, update)?;
        if changed {
            self.storage.ledger.save()?;
        }

        Ok(EditOutcome {
            changed: usize::from(changed),
            locked_skipped: 0,
        })
    }
}
