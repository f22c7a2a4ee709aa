//! Goal progress report
//!
//! Compares per-category monthly targets against actual spend over a month
//! range. Goal arithmetic stays in exact cents; only the reporting layer
//! formats it.

use std::collections::BTreeMap;

use crate::models::{Money, Transaction};

/// Progress for one expense category
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRow {
    pub category: String,
    /// Target per month
    pub monthly_goal: Money,
    /// monthly_goal × number of months in range
    pub goal_for_range: Money,
    /// Actual spend in range (positive)
    pub actual_for_range: Money,
    /// goal_for_range − actual_for_range (negative when over)
    pub remaining: Money,
    /// Actual exceeded the range goal
    pub over: bool,
}

/// Goal progress across all configured expense categories
#[derive(Debug, Clone, PartialEq)]
pub struct GoalReport {
    pub rows: Vec<GoalRow>,
    pub total_goal: Money,
    pub total_actual: Money,
    pub total_remaining: Money,
}

impl GoalReport {
    /// Build the report for the given months (1..=12) of one year's rows
    ///
    /// Categories follow the caller-supplied list order; categories without a
    /// stored goal report a zero target.
    pub fn generate(
        goals: &BTreeMap<String, Money>,
        transactions: &[Transaction],
        expense_categories: &[String],
        months: &[u32],
    ) -> Self {
        let n_months = months.len() as i64;

        let mut actual_by_category: BTreeMap<&str, Money> = BTreeMap::new();
        for txn in transactions {
            if !txn.counts_as_expense() || !months.contains(&txn.month()) {
                continue;
            }
            if let Some(category) = txn.category.as_deref() {
                let spend = -txn.amount;
                *actual_by_category.entry(category).or_insert(Money::zero()) += spend;
            }
        }

        let rows: Vec<GoalRow> = expense_categories
            .iter()
            .map(|category| {
                let monthly_goal = goals.get(category).copied().unwrap_or_default();
                let goal_for_range = Money::from_cents(monthly_goal.cents() * n_months);
                let actual_for_range = actual_by_category
                    .get(category.as_str())
                    .copied()
                    .unwrap_or_default();
                GoalRow {
                    category: category.clone(),
                    monthly_goal,
                    goal_for_range,
                    actual_for_range,
                    remaining: goal_for_range - actual_for_range,
                    over: actual_for_range > goal_for_range,
                }
            })
            .collect();

        let total_goal: Money = rows.iter().map(|r| r.goal_for_range).sum();
        let total_actual: Money = rows.iter().map(|r| r.actual_for_range).sum();

        Self {
            rows,
            total_goal,
            total_actual,
            total_remaining: total_goal - total_actual,
        }
    }
}
