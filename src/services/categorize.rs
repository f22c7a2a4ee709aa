//! Category mapper
//!
//! Maintains the persistent description→category preference map and applies
//! it: suggestions for new descriptions, retroactive categorization of
//! already-imported rows, and an explicitly opt-in similar-variant pass based
//! on normalized descriptions.

use std::collections::BTreeSet;

use tracing::info;

use crate::config::repository::PreferenceMap;
use crate::config::ConfigRepository;
use crate::error::BudgetResult;
use crate::models::{Money, Transaction, TransactionUpdate};
use crate::storage::Storage;

/// Normalize a description for variant grouping
///
/// Uppercases, collapses whitespace, and strips every digit. Stripping all
/// digit runs is aggressive on purpose: it folds card suffixes and store
/// numbers, at the cost of occasionally conflating distinct merchants, which
/// is why nothing applies it without an explicit opt-in.
pub fn normalize_description(desc: &str) -> String {
    let upper = desc.to_uppercase();
    let collapsed: Vec<&str> = upper.split_whitespace().collect();
    let joined = collapsed.join(" ");
    let without_digits: String = joined.chars().filter(|c| !c.is_ascii_digit()).collect();
    without_digits
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts from a retroactive categorization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Rows whose category was set
    pub changed: usize,
    /// Matching rows withheld because their month is locked
    pub locked_skipped: usize,
}

/// Counts from recording one mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingOutcome {
    /// Rows recategorized across the exact match and any variants
    pub recategorized: usize,
    /// Matching rows withheld because their month is locked
    pub locked_skipped: usize,
    /// Additional descriptions covered by the similar-variant pass
    pub similar_descriptions: usize,
}

/// One uncategorized description group in the categorization worklist
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGroup {
    pub description: String,
    pub count: usize,
    /// Total spend (positive) across the group
    pub total_spend: Money,
    pub first_date: chrono::NaiveDate,
    pub last_date: chrono::NaiveDate,
}

/// Service for the preference map and categorization
pub struct CategoryService<'a> {
    storage: &'a Storage,
    config: &'a ConfigRepository,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage, config: &'a ConfigRepository) -> Self {
        Self { storage, config }
    }

    /// Suggest a category for a description
    ///
    /// Exact raw lookup first; otherwise the first stored key (in sorted
    /// order, so the answer is deterministic) whose normalized form matches.
    pub fn suggest(&self, description: &str) -> BudgetResult<Option<String>> {
        let prefs = self.config.load_preferences()?;

        if let Some(category) = prefs.get(description) {
            return Ok(Some(category.clone()));
        }

        let norm = normalize_description(description);
        if norm.is_empty() {
            return Ok(None);
        }

        Ok(prefs
            .iter()
            .find(|(key, _)| normalize_description(key) == norm)
            .map(|(_, category)| category.clone()))
    }

    /// Record a mapping and apply it retroactively
    ///
    /// Updates the preference map, categorizes the year's uncategorized
    /// expense rows with this exact description (outside locked months), and
    /// optionally extends to descriptions sharing the normalized form.
    pub fn record_mapping(
        &self,
        description: &str,
        category: &str,
        year: i32,
        apply_similar: bool,
    ) -> BudgetResult<MappingOutcome> {
        let locked = self.storage.locks.locked_months(year)?;
        let mut prefs = self.config.load_preferences()?;
        prefs.insert(description.to_string(), category.to_string());

        let mut outcome = MappingOutcome::default();
        let exact = self.apply_to_existing_uncategorized(description, category, year, &locked)?;
        outcome.recategorized += exact.changed;
        outcome.locked_skipped += exact.locked_skipped;

        if apply_similar {
            let pending: Vec<String> = self
                .storage
                .ledger
                .uncategorized_expenses(year)?
                .into_iter()
                .map(|t| t.description)
                .collect();
            let variants = similar_variants(description, &pending);
            outcome.similar_descriptions = variants.len();

            for variant in variants {
                prefs.insert(variant.clone(), category.to_string());
                let applied =
                    self.apply_to_existing_uncategorized(&variant, category, year, &locked)?;
                outcome.recategorized += applied.changed;
                outcome.locked_skipped += applied.locked_skipped;
            }
        }

        self.config.save_preferences(&prefs)?;

        info!(
            description,
            category,
            recategorized = outcome.recategorized,
            locked_skipped = outcome.locked_skipped,
            similar = outcome.similar_descriptions,
            "mapping recorded"
        );
        Ok(outcome)
    }

    /// Set the category on uncategorized expense rows matching a description
    ///
    /// Rows in locked months are skipped and counted; a fully locked year
    /// yields a zero-change outcome.
    pub fn apply_to_existing_uncategorized(
        &self,
        description: &str,
        category: &str,
        year: i32,
        locked_months: &BTreeSet<u32>,
    ) -> BudgetResult<ApplyOutcome> {
        let matching: Vec<Transaction> = self
            .storage
            .ledger
            .uncategorized_expenses(year)?
            .into_iter()
            .filter(|t| t.description == description)
            .collect();

        let mut outcome = ApplyOutcome::default();
        let update = TransactionUpdate {
            category: Some(Some(category.to_string())),
            ..Default::default()
        };

        for txn in matching {
            if locked_months.contains(&txn.month()) {
                outcome.locked_skipped += 1;
                continue;
            }
            if self.storage.ledger.update(&txn.external_id, &update)? {
                outcome.changed += 1;
            }
        }

        if outcome.changed > 0 {
            self.storage.ledger.save()?;
        }
        Ok(outcome)
    }

    /// The year's uncategorized expense rows grouped by description
    ///
    /// Sorted by count, then total spend, then description, matching how a
    /// categorization worklist is triaged.
    pub fn pending(&self, year: i32) -> BudgetResult<Vec<PendingGroup>> {
        let rows = self.storage.ledger.uncategorized_expenses(year)?;

        let mut groups: Vec<PendingGroup> = Vec::new();
        for txn in rows {
            let spend = -txn.amount;
            match groups.iter_mut().find(|g| g.description == txn.description) {
                Some(group) => {
                    group.count += 1;
                    group.total_spend += spend;
                    group.first_date = group.first_date.min(txn.date);
                    group.last_date = group.last_date.max(txn.date);
                }
                None => groups.push(PendingGroup {
                    description: txn.description.clone(),
                    count: 1,
                    total_spend: spend,
                    first_date: txn.date,
                    last_date: txn.date,
                }),
            }
        }

        groups.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(b.total_spend.cmp(&a.total_spend))
                .then(a.description.cmp(&b.description))
        });
        Ok(groups)
    }
}

/// Descriptions among `candidates` sharing `description`'s normalized form
///
/// Exact matches are excluded; this is the best-effort variant pass and is
/// only ever run behind an explicit opt-in.
pub fn similar_variants(description: &str, candidates: &[String]) -> Vec<String> {
    let base = normalize_description(description);
    if base.is_empty() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    candidates
        .iter()
        .filter(|c| c.as_str() != description && normalize_description(c) == base)
        .filter(|c| seen.insert(c.as_str().to_string()))
        .cloned()
        .collect()
}
