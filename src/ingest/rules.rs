//! Per-source classification rules
//!
//! Statement formats differ in how they flag payments, credits, and other
//! special rows. Rather than hard-coding each bank's quirks, a source profile
//! carries a list of data-driven rules matched against the statement's type
//! column; profiles are serde-serializable so new sources can ship as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, TxnKind};

/// What a matched rule does to the row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    /// Keep the row but exclude it from totals (card payments, transfers)
    Exclude,
    /// Reroute the row to income with a fixed category
    RouteToIncome {
        category: String,
        /// Only applies when the signed amount is positive
        #[serde(default)]
        positive_only: bool,
    },
}

/// A single keyword rule against the statement's type column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Case-insensitive substring matched against the type field
    pub type_contains: String,
    #[serde(flatten)]
    pub action: RuleAction,
}

/// How a row should enter the ledger after classification
#[derive(Debug, Clone, PartialEq)]
pub struct RowClass {
    pub kind: TxnKind,
    pub excluded: bool,
    pub category: Option<String>,
}

impl Default for RowClass {
    fn default() -> Self {
        Self {
            kind: TxnKind::Expense,
            excluded: false,
            category: None,
        }
    }
}

/// A named statement source with its classification rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl SourceProfile {
    /// Credit-card statement profile: payments are excluded, statement
    /// credits are rerouted to income.
    pub fn credit_card() -> Self {
        Self {
            name: "credit-card".into(),
            rules: vec![
                ClassificationRule {
                    type_contains: "payment".into(),
                    action: RuleAction::Exclude,
                },
                ClassificationRule {
                    type_contains: "adjustment".into(),
                    action: RuleAction::RouteToIncome {
                        category: "Credit Card Redemptions/Interest".into(),
                        positive_only: true,
                    },
                },
            ],
        }
    }

    /// Plain bank statement profile with no special rows
    pub fn bank() -> Self {
        Self {
            name: "bank".into(),
            rules: Vec::new(),
        }
    }

    /// Load a profile from a JSON file
    pub fn from_file(path: &Path) -> BudgetResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BudgetError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents).map_err(|e| {
            BudgetError::Validation(format!("Invalid source profile {}: {}", path.display(), e))
        })
    }

    /// Classify a row from its type field and signed amount
    ///
    /// The first matching rule wins. Rows default to non-excluded expenses.
    pub fn classify(&self, type_field: &str, amount: Money) -> RowClass {
        let type_lower = type_field.trim().to_lowercase();
        if type_lower.is_empty() {
            return RowClass::default();
        }

        for rule in &self.rules {
            if !type_lower.contains(&rule.type_contains.to_lowercase()) {
                continue;
            }
            match &rule.action {
                RuleAction::Exclude => {
                    return RowClass {
                        excluded: true,
                        ..RowClass::default()
                    };
                }
                RuleAction::RouteToIncome {
                    category,
                    positive_only,
                } => {
                    if *positive_only && !amount.is_positive() {
                        continue;
                    }
                    return RowClass {
                        kind: TxnKind::Income,
                        excluded: false,
                        category: Some(category.clone()),
                    };
                }
            }
        }

        RowClass::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_row_is_expense() {
        let profile = SourceProfile::bank();
        let class = profile.classify("", Money::from_cents(-500));
        assert_eq!(class, RowClass::default());
    }

    #[test]
    fn test_payment_excluded() {
        let profile = SourceProfile::credit_card();
        let class = profile.classify("Payment", Money::from_cents(50000));
        assert!(class.excluded);
        assert_eq!(class.kind, TxnKind::Expense);
    }

    #[test]
    fn test_adjustment_routed_to_income_when_positive() {
        let profile = SourceProfile::credit_card();
        let class = profile.classify("Adjustment", Money::from_cents(1250));
        assert_eq!(class.kind, TxnKind::Income);
        assert_eq!(
            class.category.as_deref(),
            Some("Credit Card Redemptions/Interest")
        );
        assert!(!class.excluded);
    }

    #[test]
    fn test_negative_adjustment_stays_expense() {
        let profile = SourceProfile::credit_card();
        let class = profile.classify("Adjustment", Money::from_cents(-1250));
        assert_eq!(class.kind, TxnKind::Expense);
        assert!(class.category.is_none());
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let profile = SourceProfile::credit_card();
        let class = profile.classify("AUTOPAY PAYMENT RECEIVED", Money::from_cents(10000));
        assert!(class.excluded);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let profile = SourceProfile {
            name: "custom".into(),
            rules: vec![
                ClassificationRule {
                    type_contains: "credit".into(),
                    action: RuleAction::Exclude,
                },
                ClassificationRule {
                    type_contains: "credit".into(),
                    action: RuleAction::RouteToIncome {
                        category: "Refunds".into(),
                        positive_only: false,
                    },
                },
            ],
        };
        let class = profile.classify("credit", Money::from_cents(100));
        assert!(class.excluded);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = SourceProfile::credit_card();
        let json = serde_json::to_string(&profile).unwrap();
        let back: SourceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }

    #[test]
    fn test_profile_from_json_text() {
        let json = r#"{
            "name": "store-card",
            "rules": [
                {"type_contains": "fee", "action": "exclude"},
                {"type_contains": "reward", "action": "route_to_income",
                 "category": "Rewards", "positive_only": true}
            ]
        }"#;
        let profile: SourceProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.rules.len(), 2);
        assert!(profile.classify("Annual Fee", Money::from_cents(-9500)).excluded);
        assert_eq!(
            profile
                .classify("Reward", Money::from_cents(500))
                .category
                .as_deref(),
            Some("Rewards")
        );
    }
}
