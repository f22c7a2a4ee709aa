//! Statement import service
//!
//! Runs the full ingestion pipeline for one statement: parse, classify,
//! assign identifiers, filter locked months, auto-categorize from the
//! preference map, and insert into the ledger. Row-level problems become
//! counts in the report, never exceptions.

use std::collections::HashMap;
use std::io::Read;

use chrono::Utc;
use tracing::info;

use crate::config::ConfigRepository;
use crate::error::BudgetResult;
use crate::ingest::identity;
use crate::ingest::{SourceProfile, StatementParser};
use crate::models::{Transaction, TxnKind};
use crate::storage::Storage;

/// Options for one import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Import into locked months anyway (off by default)
    pub allow_locked: bool,
    /// Apply the preference map to uncategorized expense rows
    pub auto_categorize: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            allow_locked: false,
            auto_categorize: true,
        }
    }
}

/// Counts describing one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows successfully parsed from the statement
    pub parsed: usize,
    /// Rows dropped by the parser (bad date/amount, empty description)
    pub skipped_rows: usize,
    /// Rows skipped because their month is locked
    pub locked_skipped: usize,
    /// Rows newly inserted into the ledger
    pub inserted: usize,
    /// Rows skipped as duplicates of existing ledger rows
    pub duplicates: usize,
}

/// Service for statement imports
pub struct ImportService<'a> {
    storage: &'a Storage,
    config: &'a ConfigRepository,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage, config: &'a ConfigRepository) -> Self {
        Self { storage, config }
    }

    /// Import one statement from a reader
    ///
    /// Identifier assignment happens before the locked-month filter, so
    /// skipping locked rows never shifts the identifiers of the rest.
    pub fn import_statement<R: Read>(
        &self,
        reader: R,
        profile: SourceProfile,
        account: &str,
        options: &ImportOptions,
    ) -> BudgetResult<ImportReport> {
        let parser = StatementParser::new(profile, account);
        let outcome = parser.parse(reader)?;

        let mut report = ImportReport {
            parsed: outcome.records.len(),
            skipped_rows: outcome.skipped_rows,
            ..Default::default()
        };

        let mut transactions = identity::into_transactions(outcome.records, Utc::now());

        if !options.allow_locked {
            let (kept, locked_skipped) = self.filter_locked(transactions)?;
            transactions = kept;
            report.locked_skipped = locked_skipped;
        }

        if options.auto_categorize {
            self.apply_preferences(&mut transactions)?;
        }

        let insert = self.storage.ledger.insert(transactions)?;
        report.inserted = insert.inserted;
        report.duplicates = insert.duplicates;
        self.storage.ledger.save()?;

        info!(
            account,
            parsed = report.parsed,
            inserted = report.inserted,
            duplicates = report.duplicates,
            locked_skipped = report.locked_skipped,
            skipped_rows = report.skipped_rows,
            "statement import finished"
        );
        Ok(report)
    }

    /// Drop rows whose (year, month) is locked, counting them
    fn filter_locked(
        &self,
        transactions: Vec<Transaction>,
    ) -> BudgetResult<(Vec<Transaction>, usize)> {
        let mut locked_by_year = HashMap::new();
        let mut kept = Vec::with_capacity(transactions.len());
        let mut locked_skipped = 0;

        for txn in transactions {
            let year = txn.year();
            if !locked_by_year.contains_key(&year) {
                let months = self.storage.locks.locked_months(year)?;
                locked_by_year.insert(year, months);
            }
            if locked_by_year[&year].contains(&txn.month()) {
                locked_skipped += 1;
            } else {
                kept.push(txn);
            }
        }

        Ok((kept, locked_skipped))
    }

    /// Fill categories for expense rows from the preference map
    fn apply_preferences(&self, transactions: &mut [Transaction]) -> BudgetResult<()> {
        let prefs = self.config.load_preferences()?;
        if prefs.is_empty() {
            return Ok(());
        }

        for txn in transactions.iter_mut() {
            if txn.kind == TxnKind::Expense && txn.is_uncategorized() {
                if let Some(category) = prefs.get(&txn.description) {
                    txn.category = Some(category.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    const STATEMENT: &str = "\
Transaction Date,Post Date,Description,Amount,Type
01/15/2024,01/16/2024,COFFEE SHOP #12,-4.50,Sale
01/15/2024,01/16/2024,COFFEE SHOP #12,-4.50,Sale
02/01/2024,02/02/2024,MARKET STREET GROCERY,-82.17,Sale
02/10/2024,02/11/2024,AUTOPAY THANK YOU,500.00,Payment
03/05/2024,03/06/2024,STATEMENT CREDIT,12.50,Adjustment";

    fn create_fixture() -> (TempDir, Storage, ConfigRepository) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        let config = ConfigRepository::new(paths);
        (temp_dir, storage, config)
    }

    #[test]
    fn test_import_counts() {
        let (_temp_dir, storage, config) = create_fixture();
        let service = ImportService::new(&storage, &config);

        let report = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions::default(),
            )
            .unwrap();

        assert_eq!(report.parsed, 5);
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(report.inserted, 5);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.locked_skipped, 0);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let (_temp_dir, storage, config) = create_fixture();
        let service = ImportService::new(&storage, &config);
        let opts = ImportOptions::default();

        let first = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &opts,
            )
            .unwrap();
        let second = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &opts,
            )
            .unwrap();

        assert_eq!(first.inserted, 5);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, 5);
        assert_eq!(second.inserted + second.duplicates, second.parsed);
        assert_eq!(storage.ledger.count().unwrap(), 5);
    }

    #[test]
    fn test_repeated_purchases_both_kept() {
        let (_temp_dir, storage, config) = create_fixture();
        let service = ImportService::new(&storage, &config);

        service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions::default(),
            )
            .unwrap();

        let coffee: Vec<_> = storage
            .ledger
            .fetch_year(2024)
            .unwrap()
            .into_iter()
            .filter(|t| t.description == "COFFEE SHOP #12")
            .collect();
        assert_eq!(coffee.len(), 2);
        assert_ne!(coffee[0].external_id, coffee[1].external_id);
    }

    #[test]
    fn test_locked_months_filtered_with_count() {
        let (_temp_dir, storage, config) = create_fixture();
        storage
            .locks
            .set_locked_months(2024, BTreeSet::from([1]))
            .unwrap();

        let service = ImportService::new(&storage, &config);
        let report = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions::default(),
            )
            .unwrap();

        // The two January coffee rows were withheld.
        assert_eq!(report.locked_skipped, 2);
        assert_eq!(report.inserted, 3);

        // Skipping locked rows must not change identifiers: unlocking and
        // re-importing slots the held-back rows in alongside the rest.
        storage.locks.set_locked_months(2024, BTreeSet::new()).unwrap();
        let second = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions::default(),
            )
            .unwrap();
        assert_eq!(second.inserted, 2);
        assert_eq!(second.duplicates, 3);
        assert_eq!(storage.ledger.count().unwrap(), 5);
    }

    #[test]
    fn test_allow_locked_override() {
        let (_temp_dir, storage, config) = create_fixture();
        storage
            .locks
            .set_locked_months(2024, BTreeSet::from([1, 2, 3]))
            .unwrap();

        let service = ImportService::new(&storage, &config);
        let report = service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions {
                    allow_locked: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.locked_skipped, 0);
        assert_eq!(report.inserted, 5);
    }

    #[test]
    fn test_preference_map_applied_to_expenses() {
        let (_temp_dir, storage, config) = create_fixture();

        let mut prefs = crate::config::repository::PreferenceMap::new();
        prefs.insert("MARKET STREET GROCERY".into(), "Groceries".into());
        prefs.insert("STATEMENT CREDIT".into(), "ShouldNotApply".into());
        config.save_preferences(&prefs).unwrap();

        let service = ImportService::new(&storage, &config);
        service
            .import_statement(
                STATEMENT.as_bytes(),
                SourceProfile::credit_card(),
                "Chase",
                &ImportOptions::default(),
            )
            .unwrap();

        let rows = storage.ledger.fetch_year(2024).unwrap();
        let grocery = rows
            .iter()
            .find(|t| t.description == "MARKET STREET GROCERY")
            .unwrap();
        assert_eq!(grocery.category.as_deref(), Some("Groceries"));

        // The adjustment row is income and keeps its rule-assigned category.
        let credit = rows
            .iter()
            .find(|t| t.description == "STATEMENT CREDIT")
            .unwrap();
        assert_eq!(
            credit.category.as_deref(),
            Some("Credit Card Redemptions/Interest")
        );
    }
}
