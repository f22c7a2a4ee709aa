//! Terminal rendering and value formatting
//!
//! Currency/percent formatting shared with the exports, and tabled-based
//! terminal tables for summaries, worklists, and transaction listings.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::Transaction;
use crate::reports::{GoalReport, SavingsSummary, SummaryRow, SummaryTable, MONTHS_PER_YEAR};
use crate::services::PendingGroup;

/// Month column labels in table order
pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format dollars as currency with thousands separators: `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}.{:02}", grouped, frac)
    } else {
        format!("${}.{:02}", grouped, frac)
    }
}

/// Format a 0..1 rate as a percentage: `65.00%`
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn summary_header(first_column: &str) -> Vec<String> {
    let mut header = vec![first_column.to_string()];
    header.extend(MONTH_LABELS.iter().map(|m| m.to_string()));
    header.extend(
        [
            "Average Per Month",
            "YTD Totals",
            "Average Per Week",
            "Average Per Day",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    header
}

fn summary_record(row: &SummaryRow) -> Vec<String> {
    let mut record = vec![row.label.clone()];
    record.extend(row.months.iter().map(|&v| format_currency(v)));
    record.push(format_currency(row.average_per_month));
    record.push(format_currency(row.ytd_total));
    record.push(format_currency(row.average_per_week));
    record.push(format_currency(row.average_per_day));
    record
}

/// Render a category summary table, with optional extra rows (such as the
/// uncategorized row) placed just before the totals row
pub fn render_summary_table(table: &SummaryTable, extra_rows: &[SummaryRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(summary_header("Category"));
    for row in &table.rows {
        builder.push_record(summary_record(row));
    }
    for row in extra_rows {
        builder.push_record(summary_record(row));
    }
    builder.push_record(summary_record(&table.total));

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}

/// Render the savings rows (saved amounts plus the rate row)
pub fn render_savings(savings: &SavingsSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(summary_header("Metric"));
    builder.push_record(summary_record(&savings.saved));

    // Rate row: percentages per month and for YTD; derived averages have no
    // meaning for a ratio and stay blank.
    let mut rate_record = vec!["Savings Rate".to_string()];
    rate_record.extend(savings.monthly_rates.iter().map(|&r| format_percent(r)));
    rate_record.push(String::new());
    rate_record.push(format_percent(savings.ytd_rate));
    rate_record.push(String::new());
    rate_record.push(String::new());
    builder.push_record(rate_record);

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}

/// Render the categorization worklist
pub fn render_pending(groups: &[PendingGroup]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Description", "Count", "Total Spend", "First", "Last"]);
    for group in groups {
        builder.push_record([
            group.description.clone(),
            group.count.to_string(),
            format_currency(group.total_spend.to_dollars()),
            group.first_date.format("%Y-%m-%d").to_string(),
            group.last_date.format("%Y-%m-%d").to_string(),
        ]);
    }

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}

/// Render goal progress
pub fn render_goals(report: &GoalReport) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Category",
        "Monthly Goal",
        "Goal (range)",
        "Actual (range)",
        "Remaining",
        "Status",
    ]);
    for row in &report.rows {
        builder.push_record([
            row.category.clone(),
            format_currency(row.monthly_goal.to_dollars()),
            format_currency(row.goal_for_range.to_dollars()),
            format_currency(row.actual_for_range.to_dollars()),
            format_currency(row.remaining.to_dollars()),
            if row.over { "Over" } else { "On track" }.to_string(),
        ]);
    }
    builder.push_record([
        "Total".to_string(),
        String::new(),
        format_currency(report.total_goal.to_dollars()),
        format_currency(report.total_actual.to_dollars()),
        format_currency(report.total_remaining.to_dollars()),
        String::new(),
    ]);

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}

/// Render a transaction listing
pub fn render_transactions(transactions: &[Transaction]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID", "Date", "Description", "Amount", "Kind", "Account", "Category", "Excl",
    ]);
    for txn in transactions {
        builder.push_record([
            txn.external_id.clone(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.description.clone(),
            txn.amount.to_string(),
            txn.kind.to_string(),
            txn.account.clone(),
            txn.category.clone().unwrap_or_default(),
            if txn.excluded { "yes" } else { "" }.to_string(),
        ]);
    }

    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}
