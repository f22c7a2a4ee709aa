//! JSON ledger export
//!
//! Dumps one year of transactions as `{"year": <int>, "transactions": [...]}`.

use std::io::Write;

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Transaction;

#[derive(Serialize)]
struct LedgerDump<'a> {
    year: i32,
    transactions: &'a [Transaction],
}

/// Write one year of transactions as a pretty-printed JSON document
pub fn write_ledger_json<W: Write>(
    writer: W,
    year: i32,
    transactions: &[Transaction],
) -> BudgetResult<()> {
    let dump = LedgerDump { year, transactions };
    serde_json::to_writer_pretty(writer, &dump).map_err(|e| BudgetError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TxnKind};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_json_shape() {
        let txn = Transaction {
            external_id: "abcd1234abcd1234-1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            posted_date: None,
            description: "MARKET".into(),
            amount: Money::from_cents(-1000),
            kind: TxnKind::Expense,
            account: "Chase".into(),
            category: None,
            excluded: false,
            notes: None,
            created_at: Utc::now(),
        };

        let mut out = Vec::new();
        write_ledger_json(&mut out, 2024, &[txn]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["year"], 2024);
        assert_eq!(value["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(
            value["transactions"][0]["external_id"],
            "abcd1234abcd1234-1"
        );
        assert_eq!(value["transactions"][0]["kind"], "expense");
    }
}
