//! Transaction model
//!
//! A ledger transaction keyed by a content-derived external identifier.
//! Amounts are signed: negative for expenses, positive for income/refunds.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Semantic direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    /// Spending (signed amount is conventionally negative)
    #[default]
    Expense,
    /// Income or refunds (signed amount is conventionally positive)
    Income,
}

impl TxnKind {
    /// Stable lowercase name, used in content signatures and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TxnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("unknown transaction kind: {}", other)),
        }
    }
}

/// A ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Content-derived identifier, unique across the ledger
    pub external_id: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Posted date, when the statement provides one
    pub posted_date: Option<NaiveDate>,

    /// Statement description / merchant string
    pub description: String,

    /// Signed amount (negative = expense, positive = income/refund)
    pub amount: Money,

    /// Expense or income
    pub kind: TxnKind,

    /// Source account name
    #[serde(default)]
    pub account: String,

    /// Assigned category, if any
    pub category: Option<String>,

    /// Excluded from totals (card payments, internal transfers)
    #[serde(default)]
    pub excluded: bool,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the row was first inserted
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Year of the transaction date
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month of the transaction date (1..=12)
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Whether the category is absent or blank
    pub fn is_uncategorized(&self) -> bool {
        self.category.as_deref().map_or(true, |c| c.is_empty())
    }

    /// Whether this row counts toward expense totals
    pub fn counts_as_expense(&self) -> bool {
        self.kind == TxnKind::Expense && !self.excluded
    }

    /// Whether this row counts toward income totals
    pub fn counts_as_income(&self) -> bool {
        self.kind == TxnKind::Income && !self.excluded
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// A partial update of the mutable transaction fields
///
/// `None` leaves a field unchanged; for the optional fields the inner
/// `Option` distinguishes "set" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<NaiveDate>,
    pub posted_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub kind: Option<TxnKind>,
    pub account: Option<String>,
    pub category: Option<Option<String>>,
    pub excluded: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl TransactionUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.posted_date.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.account.is_none()
            && self.category.is_none()
            && self.excluded.is_none()
            && self.notes.is_none()
    }

    /// Apply the update in place
    pub fn apply(&self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(posted) = self.posted_date.clone() {
            txn.posted_date = posted;
        }
        if let Some(desc) = &self.description {
            txn.description = desc.clone();
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(account) = &self.account {
            txn.account = account.clone();
        }
        if let Some(category) = self.category.clone() {
            txn.category = category;
        }
        if let Some(excluded) = self.excluded {
            txn.excluded = excluded;
        }
        if let Some(notes) = self.notes.clone() {
            txn.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_txn() -> Transaction {
        Transaction {
            external_id: "abcd1234abcd1234-1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            posted_date: None,
            description: "COFFEE SHOP".into(),
            amount: Money::from_cents(-450),
            kind: TxnKind::Expense,
            account: "Chase".into(),
            category: None,
            excluded: false,
            notes: None,
            created_at: DateTime::parse_from_rfc3339("2024-03-16T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_year_month() {
        let txn = sample_txn();
        assert_eq!(txn.year(), 2024);
        assert_eq!(txn.month(), 3);
    }

    #[test]
    fn test_uncategorized() {
        let mut txn = sample_txn();
        assert!(txn.is_uncategorized());

        txn.category = Some(String::new());
        assert!(txn.is_uncategorized());

        txn.category = Some("Coffee".into());
        assert!(!txn.is_uncategorized());
    }

    #[test]
    fn test_counts_as() {
        let mut txn = sample_txn();
        assert!(txn.counts_as_expense());
        assert!(!txn.counts_as_income());

        txn.excluded = true;
        assert!(!txn.counts_as_expense());

        txn.excluded = false;
        txn.kind = TxnKind::Income;
        assert!(txn.counts_as_income());
        assert!(!txn.counts_as_expense());
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("expense".parse::<TxnKind>().unwrap(), TxnKind::Expense);
        assert_eq!("Income".parse::<TxnKind>().unwrap(), TxnKind::Income);
        assert!("transfer".parse::<TxnKind>().is_err());
        assert_eq!(TxnKind::Income.to_string(), "income");
    }

    #[test]
    fn test_update_apply() {
        let mut txn = sample_txn();
        let update = TransactionUpdate {
            category: Some(Some("Coffee".into())),
            excluded: Some(true),
            notes: Some(Some("team meetup".into())),
            ..Default::default()
        };
        update.apply(&mut txn);

        assert_eq!(txn.category.as_deref(), Some("Coffee"));
        assert!(txn.excluded);
        assert_eq!(txn.notes.as_deref(), Some("team meetup"));
        // Untouched fields stay put
        assert_eq!(txn.amount.cents(), -450);
    }

    #[test]
    fn test_update_clear_category() {
        let mut txn = sample_txn();
        txn.category = Some("Coffee".into());

        let update = TransactionUpdate {
            category: Some(None),
            ..Default::default()
        };
        update.apply(&mut txn);
        assert!(txn.category.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TransactionUpdate::default().is_empty());
        let update = TransactionUpdate {
            excluded: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_serialization() {
        let txn = sample_txn();
        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn.external_id, deserialized.external_id);
        assert_eq!(txn.amount, deserialized.amount);
        assert_eq!(txn.kind, deserialized.kind);
        assert_eq!(txn.date, deserialized.date);
    }
}
