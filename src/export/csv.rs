//! CSV ledger export

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Transaction;

/// Write all transactions as CSV with a header row
pub fn write_ledger_csv<W: Write>(writer: W, transactions: &[Transaction]) -> BudgetResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "external_id",
            "date",
            "posted_date",
            "description",
            "amount",
            "kind",
            "account",
            "category",
            "excluded",
            "notes",
            "created_at",
        ])
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    for txn in transactions {
        csv_writer
            .write_record([
                txn.external_id.clone(),
                txn.date.format("%Y-%m-%d").to_string(),
                txn.posted_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                txn.description.clone(),
                txn.amount.format_plain(),
                txn.kind.as_str().to_string(),
                txn.account.clone(),
                txn.category.clone().unwrap_or_default(),
                if txn.excluded { "1" } else { "0" }.to_string(),
                txn.notes.clone().unwrap_or_default(),
                txn.created_at.to_rfc3339(),
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TxnKind};
    use chrono::{NaiveDate, Utc};

    fn sample() -> Transaction {
        Transaction {
            external_id: "abcd1234abcd1234-1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 16),
            description: "COFFEE, THE SHOP".into(),
            amount: Money::from_cents(-450),
            kind: TxnKind::Expense,
            account: "Chase".into(),
            category: Some("Coffee".into()),
            excluded: false,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_csv_export() {
        let mut out = Vec::new();
        write_ledger_csv(&mut out, &[sample()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("external_id,date,"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("abcd1234abcd1234-1,2024-01-15,2024-01-16,"));
        // Embedded comma is quoted
        assert!(row.contains("\"COFFEE, THE SHOP\""));
        assert!(row.contains("-4.50"));
        assert!(row.contains("expense"));
    }

    #[test]
    fn test_empty_ledger_still_has_header() {
        let mut out = Vec::new();
        write_ledger_csv(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
