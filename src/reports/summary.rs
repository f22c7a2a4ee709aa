//! Monthly summary tables
//!
//! Builds the category × month expense and income tables, the savings rows,
//! and the YTD savings rate from one year of transactions. A pure function of
//! its inputs: the same transactions and category lists always produce
//! identical tables, and row order follows the caller-supplied lists exactly.

use crate::models::{Transaction, TxnKind};

/// Number of month columns (01..12)
pub const MONTHS_PER_YEAR: usize = 12;

// Fixed spreadsheet divisors for the derived columns; not calendar-accurate.
const MONTHS_DIVISOR: f64 = 12.0;
const WEEKS_DIVISOR: f64 = 52.0;
const DAYS_DIVISOR: f64 = 364.0;

/// Row labels for the appended totals
const TOTAL_SPENT_LABEL: &str = "Total Spent";
const TOTAL_INCOME_LABEL: &str = "Total Net Income";
const TOTAL_SAVED_LABEL: &str = "Total Saved";
const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// One category (or totals) row: twelve month cells plus derived columns
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    /// Sums per month of year, index 0 = January
    pub months: [f64; MONTHS_PER_YEAR],
    pub average_per_month: f64,
    pub ytd_total: f64,
    pub average_per_week: f64,
    pub average_per_day: f64,
}

impl SummaryRow {
    /// Build a row, computing the derived columns from the month cells
    pub fn from_months(label: impl Into<String>, months: [f64; MONTHS_PER_YEAR]) -> Self {
        let ytd_total: f64 = months.iter().sum();
        Self {
            label: label.into(),
            months,
            average_per_month: ytd_total / MONTHS_DIVISOR,
            ytd_total,
            average_per_week: ytd_total / WEEKS_DIVISOR,
            average_per_day: ytd_total / DAYS_DIVISOR,
        }
    }
}

/// A category table with its totals row
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    /// One row per configured category, in the caller-supplied order
    pub rows: Vec<SummaryRow>,
    /// Sum of all category rows per column
    pub total: SummaryRow,
}

impl SummaryTable {
    fn build(
        transactions: &[Transaction],
        categories: &[String],
        kind: TxnKind,
        total_label: &str,
    ) -> Self {
        let rows: Vec<SummaryRow> = categories
            .iter()
            .map(|category| {
                let mut months = [0.0; MONTHS_PER_YEAR];
                for txn in transactions {
                    if txn.kind != kind || txn.excluded {
                        continue;
                    }
                    if txn.category.as_deref() != Some(category.as_str()) {
                        continue;
                    }
                    months[(txn.month() - 1) as usize] += value_of(txn);
                }
                SummaryRow::from_months(category.clone(), months)
            })
            .collect();

        let mut total_months = [0.0; MONTHS_PER_YEAR];
        for row in &rows {
            for (total, cell) in total_months.iter_mut().zip(row.months.iter()) {
                *total += cell;
            }
        }

        Self {
            total: SummaryRow::from_months(total_label, total_months),
            rows,
        }
    }
}

/// The savings rows derived from the two tables
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsSummary {
    /// income − spend per month, with derived columns
    pub saved: SummaryRow,
    /// saved / income per month; 0 whenever income is not positive
    pub monthly_rates: [f64; MONTHS_PER_YEAR],
    /// YTD saved / YTD income; 0 when income is not positive
    pub ytd_rate: f64,
}

/// The full year summary
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub expenses: SummaryTable,
    pub income: SummaryTable,
    pub savings: SavingsSummary,
}

/// Signed ledger amount → table value
///
/// Expenses flip sign so spend reads positive (a refund reads negative);
/// income uses the raw amount.
fn value_of(txn: &Transaction) -> f64 {
    match txn.kind {
        TxnKind::Expense => -txn.amount.to_dollars(),
        TxnKind::Income => txn.amount.to_dollars(),
    }
}

/// Build the expense, income, and savings tables for one year of rows
///
/// Categories present in the lists but absent from the data appear with
/// zeros; categorized rows whose category is not in the lists are excluded
/// here and surfaced via [`uncategorized_row`]'s counterpart workflows.
pub fn summarize(
    transactions: &[Transaction],
    expense_categories: &[String],
    income_categories: &[String],
) -> YearSummary {
    let expenses = SummaryTable::build(
        transactions,
        expense_categories,
        TxnKind::Expense,
        TOTAL_SPENT_LABEL,
    );
    let income = SummaryTable::build(
        transactions,
        income_categories,
        TxnKind::Income,
        TOTAL_INCOME_LABEL,
    );

    let mut saved_months = [0.0; MONTHS_PER_YEAR];
    let mut monthly_rates = [0.0; MONTHS_PER_YEAR];
    for m in 0..MONTHS_PER_YEAR {
        let income_m = income.total.months[m];
        let saved_m = income_m - expenses.total.months[m];
        saved_months[m] = saved_m;
        monthly_rates[m] = if income_m > 0.0 { saved_m / income_m } else { 0.0 };
    }

    let total_saved = income.total.ytd_total - expenses.total.ytd_total;
    let ytd_rate = if income.total.ytd_total > 0.0 {
        total_saved / income.total.ytd_total
    } else {
        0.0
    };

    YearSummary {
        expenses,
        income,
        savings: SavingsSummary {
            saved: SummaryRow::from_months(TOTAL_SAVED_LABEL, saved_months),
            monthly_rates,
            ytd_rate,
        },
    }
}

/// The uncategorized-expense row, surfaced separately from the main table
pub fn uncategorized_row(transactions: &[Transaction]) -> SummaryRow {
    let mut months = [0.0; MONTHS_PER_YEAR];
    for txn in transactions {
        if txn.counts_as_expense() && txn.is_uncategorized() {
            months[(txn.month() - 1) as usize] += value_of(txn);
        }
    }
    SummaryRow::from_months(UNCATEGORIZED_LABEL, months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::{NaiveDate, Utc};

    fn txn(
        date: (i32, u32, u32),
        cents: i64,
        kind: TxnKind,
        category: Option<&str>,
    ) -> Transaction {
        Transaction {
            external_id: format!("{}-{}-{}", date.1, date.2, cents),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            posted_date: None,
            description: "TEST".into(),
            amount: Money::from_cents(cents),
            kind,
            account: "Chase".into(),
            category: category.map(String::from),
            excluded: false,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_worked_example() {
        let transactions = vec![
            txn((2024, 1, 5), -5000, TxnKind::Expense, Some("Groceries")),
            txn((2024, 2, 10), -100000, TxnKind::Expense, Some("Rent")),
            txn((2024, 1, 1), 300000, TxnKind::Income, Some("Salary")),
        ];

        let summary = summarize(
            &transactions,
            &cats(&["Groceries", "Rent"]),
            &cats(&["Salary"]),
        );

        assert_eq!(summary.expenses.rows[0].ytd_total, 50.0);
        assert_eq!(summary.expenses.rows[1].ytd_total, 1000.0);
        assert_eq!(summary.expenses.total.ytd_total, 1050.0);
        assert_eq!(summary.income.rows[0].ytd_total, 3000.0);
        assert_eq!(summary.savings.saved.ytd_total, 1950.0);
        assert!((summary.savings.ytd_rate - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_month_buckets() {
        let transactions = vec![
            txn((2024, 1, 5), -1000, TxnKind::Expense, Some("Coffee")),
            txn((2024, 1, 20), -2000, TxnKind::Expense, Some("Coffee")),
            txn((2024, 12, 31), -500, TxnKind::Expense, Some("Coffee")),
        ];

        let summary = summarize(&transactions, &cats(&["Coffee"]), &[]);
        let row = &summary.expenses.rows[0];
        assert_eq!(row.months[0], 30.0);
        assert_eq!(row.months[11], 5.0);
        assert_eq!(row.ytd_total, 35.0);
    }

    #[test]
    fn test_derived_columns_use_fixed_divisors() {
        let transactions = vec![txn((2024, 1, 5), -36400, TxnKind::Expense, Some("Coffee"))];
        let summary = summarize(&transactions, &cats(&["Coffee"]), &[]);
        let row = &summary.expenses.rows[0];

        assert_eq!(row.ytd_total, 364.0);
        assert!((row.average_per_month - 364.0 / 12.0).abs() < 1e-12);
        assert_eq!(row.average_per_week, 7.0);
        assert_eq!(row.average_per_day, 1.0);
    }

    #[test]
    fn test_missing_categories_appear_with_zeros() {
        let summary = summarize(&[], &cats(&["Groceries", "Rent"]), &cats(&["Salary"]));
        assert_eq!(summary.expenses.rows.len(), 2);
        assert_eq!(summary.expenses.rows[0].ytd_total, 0.0);
        assert_eq!(summary.income.rows[0].ytd_total, 0.0);
        assert_eq!(summary.expenses.total.ytd_total, 0.0);
    }

    #[test]
    fn test_row_order_follows_caller_list() {
        let transactions = vec![
            txn((2024, 1, 5), -1000, TxnKind::Expense, Some("Zebra")),
            txn((2024, 1, 6), -2000, TxnKind::Expense, Some("Apple")),
        ];
        let summary = summarize(&transactions, &cats(&["Zebra", "Apple"]), &[]);
        assert_eq!(summary.expenses.rows[0].label, "Zebra");
        assert_eq!(summary.expenses.rows[1].label, "Apple");
    }

    #[test]
    fn test_unlisted_categories_excluded_from_table() {
        let transactions = vec![
            txn((2024, 1, 5), -1000, TxnKind::Expense, Some("Groceries")),
            txn((2024, 1, 6), -5000, TxnKind::Expense, Some("NotConfigured")),
        ];
        let summary = summarize(&transactions, &cats(&["Groceries"]), &[]);
        assert_eq!(summary.expenses.rows.len(), 1);
        assert_eq!(summary.expenses.total.ytd_total, 10.0);
    }

    #[test]
    fn test_excluded_rows_do_not_count() {
        let mut payment = txn((2024, 1, 5), -50000, TxnKind::Expense, Some("Groceries"));
        payment.excluded = true;
        let transactions = vec![
            payment,
            txn((2024, 1, 6), -1000, TxnKind::Expense, Some("Groceries")),
        ];
        let summary = summarize(&transactions, &cats(&["Groceries"]), &[]);
        assert_eq!(summary.expenses.total.ytd_total, 10.0);
    }

    #[test]
    fn test_expense_refund_reduces_spend() {
        let transactions = vec![
            txn((2024, 1, 5), -5000, TxnKind::Expense, Some("Groceries")),
            // Refund: positive expense amount becomes negative spend
            txn((2024, 1, 9), 2000, TxnKind::Expense, Some("Groceries")),
        ];
        let summary = summarize(&transactions, &cats(&["Groceries"]), &[]);
        assert_eq!(summary.expenses.rows[0].ytd_total, 30.0);
    }

    #[test]
    fn test_savings_rate_zero_income_is_zero() {
        let transactions = vec![txn((2024, 1, 5), -5000, TxnKind::Expense, Some("Groceries"))];
        let summary = summarize(&transactions, &cats(&["Groceries"]), &cats(&["Salary"]));

        assert_eq!(summary.savings.ytd_rate, 0.0);
        assert!(summary.savings.monthly_rates.iter().all(|&r| r == 0.0));
        assert_eq!(summary.savings.saved.months[0], -50.0);
        assert!(summary.savings.ytd_rate.is_finite());
    }

    #[test]
    fn test_monthly_savings_rates() {
        let transactions = vec![
            txn((2024, 1, 1), 100000, TxnKind::Income, Some("Salary")),
            txn((2024, 1, 5), -25000, TxnKind::Expense, Some("Groceries")),
            // February: spend with no income
            txn((2024, 2, 5), -10000, TxnKind::Expense, Some("Groceries")),
        ];
        let summary = summarize(&transactions, &cats(&["Groceries"]), &cats(&["Salary"]));

        assert!((summary.savings.monthly_rates[0] - 0.75).abs() < 1e-12);
        assert_eq!(summary.savings.monthly_rates[1], 0.0);
    }

    #[test]
    fn test_determinism() {
        let transactions = vec![
            txn((2024, 1, 5), -1234, TxnKind::Expense, Some("Groceries")),
            txn((2024, 3, 7), -5678, TxnKind::Expense, Some("Rent")),
            txn((2024, 2, 1), 300000, TxnKind::Income, Some("Salary")),
        ];
        let expense_cats = cats(&["Groceries", "Rent"]);
        let income_cats = cats(&["Salary"]);

        let first = summarize(&transactions, &expense_cats, &income_cats);
        let second = summarize(&transactions, &expense_cats, &income_cats);
        assert_eq!(first, second);
    }

    #[test]
    fn test_uncategorized_row() {
        let mut excluded = txn((2024, 2, 2), -7000, TxnKind::Expense, None);
        excluded.excluded = true;
        let transactions = vec![
            txn((2024, 1, 5), -1000, TxnKind::Expense, None),
            txn((2024, 1, 6), -2000, TxnKind::Expense, Some("")),
            txn((2024, 1, 7), -3000, TxnKind::Expense, Some("Groceries")),
            excluded,
            txn((2024, 1, 8), 4000, TxnKind::Income, None),
        ];

        let row = uncategorized_row(&transactions);
        assert_eq!(row.label, "Uncategorized");
        assert_eq!(row.months[0], 30.0);
        assert_eq!(row.ytd_total, 30.0);
    }
}
