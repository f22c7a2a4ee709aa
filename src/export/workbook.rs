//! Summary sheet export
//!
//! Writes the year summary as one sheet with three labeled sections
//! (EXPENSES, INCOME, SAVINGS). Numeric cells carry currency formatting and
//! the savings-rate row carries percentages, mirroring the terminal view.

use std::io::Write;

use crate::display::{format_currency, format_percent};
use crate::error::{BudgetError, BudgetResult};
use crate::reports::{SummaryRow, SummaryTable, YearSummary, MONTHS_PER_YEAR};

/// Month column headers in sheet order (01..12)
fn month_columns() -> Vec<String> {
    (1..=MONTHS_PER_YEAR).map(|m| format!("{:02}", m)).collect()
}

fn header_record(first_column: &str) -> Vec<String> {
    let mut header = vec![first_column.to_string()];
    header.extend(month_columns());
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

fn currency_record(row: &SummaryRow) -> Vec<String> {
    let mut record = vec![row.label.clone()];
    record.extend(row.months.iter().map(|&v| format_currency(v)));
    record.push(format_currency(row.average_per_month));
    record.push(format_currency(row.ytd_total));
    record.push(format_currency(row.average_per_week));
    record.push(format_currency(row.average_per_day));
    record
}

/// Write the three-section summary sheet
///
/// `uncategorized` is slotted in just before the expense totals row when the
/// caller opts to surface it.
pub fn write_summary_sheet<W: Write>(
    writer: W,
    year: i32,
    summary: &YearSummary,
    uncategorized: Option<&SummaryRow>,
) -> BudgetResult<()> {
    // Section banners are single-cell records, so the writer must accept
    // varying record lengths.
    let mut sheet = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    write_record(&mut sheet, [format!("BudgetBook Summary - {}", year)])?;
    write_record(&mut sheet, [""])?;

    write_record(&mut sheet, ["EXPENSES"])?;
    write_table(&mut sheet, &summary.expenses, "Category", uncategorized)?;
    write_record(&mut sheet, [""])?;

    write_record(&mut sheet, ["INCOME"])?;
    write_table(&mut sheet, &summary.income, "Category", None)?;
    write_record(&mut sheet, [""])?;

    write_record(&mut sheet, ["SAVINGS"])?;
    write_record(&mut sheet, header_record("Metric"))?;
    write_record(&mut sheet, currency_record(&summary.savings.saved))?;

    let mut rate_record = vec!["Savings Rate".to_string()];
    rate_record.extend(
        summary
            .savings
            .monthly_rates
            .iter()
            .map(|&r| format_percent(r)),
    );
    rate_record.push(String::new());
    rate_record.push(format_percent(summary.savings.ytd_rate));
    rate_record.push(String::new());
    rate_record.push(String::new());
    write_record(&mut sheet, rate_record)?;

    sheet
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}

fn write_table<W: Write>(
    sheet: &mut csv::Writer<W>,
    table: &SummaryTable,
    first_column: &str,
    extra_row: Option<&SummaryRow>,
) -> BudgetResult<()> {
    write_record(sheet, header_record(first_column))?;
    for row in &table.rows {
        write_record(sheet, currency_record(row))?;
    }
    if let Some(row) = extra_row {
        write_record(sheet, currency_record(row))?;
    }
    write_record(sheet, currency_record(&table.total))
}

fn write_record<W: Write, I, S>(sheet: &mut csv::Writer<W>, record: I) -> BudgetResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    sheet
        .write_record(record)
        .map_err(|e| BudgetError::Export(e.to_string()))
}
