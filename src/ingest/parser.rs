//! Statement parser
//!
//! Turns a tabular statement export (CSV with a header row) into candidate
//! transaction records. Column names are matched case-insensitively against
//! known aliases; rows with unparseable dates or amounts, or without a
//! description, are dropped and counted rather than failing the batch.

use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, TxnKind};

use super::rules::SourceProfile;

/// Known header aliases per logical column, compared lowercased and trimmed
const DATE_ALIASES: &[&str] = &["transaction date", "date", "trans date", "trans. date"];
const POSTED_ALIASES: &[&str] = &["post date", "posted date", "posted"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "payee", "merchant", "name"];
const AMOUNT_ALIASES: &[&str] = &["amount"];
const DEBIT_ALIASES: &[&str] = &["debit", "withdrawal", "outflow"];
const CREDIT_ALIASES: &[&str] = &["credit", "deposit", "inflow"];
const TYPE_ALIASES: &[&str] = &["type", "transaction type"];

/// Date formats tried in order before the wider fallback list
const PRIMARY_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];
const FALLBACK_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y"];

/// A parsed statement row, not yet identified or persisted
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTransaction {
    pub date: NaiveDate,
    pub posted_date: Option<NaiveDate>,
    pub description: String,
    /// Signed amount (negative = expense, positive = income/refund)
    pub amount: Money,
    pub kind: TxnKind,
    pub account: String,
    pub category: Option<String>,
    pub excluded: bool,
    pub notes: Option<String>,
}

/// Result of parsing one statement
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Candidate records in statement order
    pub records: Vec<CandidateTransaction>,
    /// Rows dropped for unparseable dates/amounts or empty descriptions
    pub skipped_rows: usize,
}

/// Resolved column positions for one statement layout
#[derive(Debug, Clone)]
struct StatementColumns {
    date: usize,
    posted_date: Option<usize>,
    description: usize,
    amount: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
    type_field: Option<usize>,
}

impl StatementColumns {
    /// Resolve logical columns from the header record
    ///
    /// Fails with the full missing/found column lists when the required
    /// set (date, description, amount or debit+credit) is incomplete.
    fn resolve(headers: &StringRecord) -> BudgetResult<Self> {
        let date = find_column(headers, DATE_ALIASES);
        let posted_date = find_column(headers, POSTED_ALIASES);
        let description = find_column(headers, DESCRIPTION_ALIASES);
        let amount = find_column(headers, AMOUNT_ALIASES);
        let debit = find_column(headers, DEBIT_ALIASES);
        let credit = find_column(headers, CREDIT_ALIASES);
        let type_field = find_column(headers, TYPE_ALIASES);

        let mut missing = Vec::new();
        if date.is_none() {
            missing.push("date".to_string());
        }
        if description.is_none() {
            missing.push("description".to_string());
        }
        if amount.is_none() && (debit.is_none() || credit.is_none()) {
            missing.push("amount (or debit/credit)".to_string());
        }

        if !missing.is_empty() {
            return Err(BudgetError::MissingColumns {
                missing,
                found: headers.iter().map(|h| h.trim().to_string()).collect(),
            });
        }

        Ok(Self {
            date: date.unwrap(),
            posted_date,
            description: description.unwrap(),
            amount,
            debit,
            credit,
            type_field,
        })
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
}

/// Parser for tabular statement exports
pub struct StatementParser {
    profile: SourceProfile,
    account: String,
}

impl StatementParser {
    /// Create a parser for one source profile and target account
    pub fn new(profile: SourceProfile, account: impl Into<String>) -> Self {
        Self {
            profile,
            account: account.into(),
        }
    }

    /// Parse a statement from any reader
    ///
    /// Pure transform: no storage access, no side effects. Missing required
    /// columns abort the whole operation; bad rows are counted skips.
    pub fn parse<R: Read>(&self, reader: R) -> BudgetResult<ParseOutcome> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| BudgetError::Import(format!("Failed to read CSV header: {}", e)))?
            .clone();
        let columns = StatementColumns::resolve(&headers)?;

        let mut outcome = ParseOutcome::default();
        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!(error = %e, "unreadable CSV record skipped");
                    outcome.skipped_rows += 1;
                    continue;
                }
            };

            match self.parse_record(&record, &columns) {
                Some(candidate) => outcome.records.push(candidate),
                None => outcome.skipped_rows += 1,
            }
        }

        debug!(
            records = outcome.records.len(),
            skipped = outcome.skipped_rows,
            profile = %self.profile.name,
            "statement parsed"
        );
        Ok(outcome)
    }

    /// Parse one row; `None` means a counted skip
    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &StatementColumns,
    ) -> Option<CandidateTransaction> {
        let date = parse_date(record.get(columns.date)?)?;

        let posted_date = columns
            .posted_date
            .and_then(|i| record.get(i))
            .and_then(parse_date);

        let description = record.get(columns.description)?.trim().to_string();
        if description.is_empty() {
            return None;
        }

        let amount = self.parse_row_amount(record, columns)?;

        let type_field = columns
            .type_field
            .and_then(|i| record.get(i))
            .unwrap_or("");
        let class = self.profile.classify(type_field, amount);

        Some(CandidateTransaction {
            date,
            posted_date,
            description,
            amount,
            kind: class.kind,
            account: self.account.clone(),
            category: class.category,
            excluded: class.excluded,
            notes: None,
        })
    }

    /// Signed amount from either a single column or a debit/credit pair
    fn parse_row_amount(
        &self,
        record: &StringRecord,
        columns: &StatementColumns,
    ) -> Option<Money> {
        if let Some(amount_col) = columns.amount {
            let raw = record.get(amount_col)?.trim();
            if raw.is_empty() {
                return None;
            }
            return Money::parse(raw).ok();
        }

        let debit_raw = columns
            .debit
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or("");
        let credit_raw = columns
            .credit
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or("");

        if debit_raw.is_empty() && credit_raw.is_empty() {
            return None;
        }

        let debit = if debit_raw.is_empty() {
            Money::zero()
        } else {
            -Money::parse(debit_raw).ok()?.abs()
        };
        let credit = if credit_raw.is_empty() {
            Money::zero()
        } else {
            Money::parse(credit_raw).ok()?.abs()
        };

        Some(debit + credit)
    }
}

/// Try the ordered format list, then the wider fallbacks
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in PRIMARY_DATE_FORMATS.iter().chain(FALLBACK_DATE_FORMATS) {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> StatementParser {
        StatementParser::new(SourceProfile::credit_card(), "Chase")
    }

    #[test]
    fn test_parse_simple_statement() {
        let csv_data = "\
Transaction Date,Post Date,Description,Amount,Type
01/15/2024,01/16/2024,COFFEE SHOP #12,-4.50,Sale
01/20/2024,01/21/2024,PAYROLL DEPOSIT,2500.00,Sale";

        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_rows, 0);

        let first = &outcome.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(
            first.posted_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap())
        );
        assert_eq!(first.description, "COFFEE SHOP #12");
        assert_eq!(first.amount.cents(), -450);
        assert_eq!(first.kind, TxnKind::Expense);
        assert_eq!(first.account, "Chase");
        assert!(!first.excluded);
    }

    #[test]
    fn test_header_matching_is_case_insensitive() {
        let csv_data = "DATE,DESCRIPTION,AMOUNT\n2024-01-15,MARKET,-10.00";
        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let csv_data = "Description,Amount\nMARKET,-10.00";
        let err = parser().parse(csv_data.as_bytes()).unwrap_err();
        match err {
            BudgetError::MissingColumns { missing, found } => {
                assert_eq!(missing, vec!["date".to_string()]);
                assert!(found.contains(&"Description".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_rows_are_counted_skips() {
        let csv_data = "\
Date,Description,Amount
not-a-date,MARKET,-10.00
2024-01-15,,-10.00
2024-01-15,MARKET,ten dollars
2024-01-16,MARKET,-10.00";

        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped_rows, 3);
    }

    #[test]
    fn test_parenthesized_amount_is_negative() {
        let csv_data = "Date,Description,Amount\n2024-01-15,MARKET,\"(12.34)\"";
        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records[0].amount.cents(), -1234);
    }

    #[test]
    fn test_currency_symbols_and_separators_stripped() {
        let csv_data = "Date,Description,Amount\n2024-01-15,RENT,\"-$1,250.00\"";
        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records[0].amount.cents(), -125000);
    }

    #[test]
    fn test_debit_credit_pair() {
        let csv_data = "\
Date,Description,Debit,Credit
2024-01-15,MARKET,10.00,
2024-01-16,PAYROLL,,2500.00
2024-01-17,NOTHING,,";

        let outcome = StatementParser::new(SourceProfile::bank(), "BOA")
            .parse(csv_data.as_bytes())
            .unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_rows, 1);
        assert_eq!(outcome.records[0].amount.cents(), -1000);
        assert_eq!(outcome.records[1].amount.cents(), 250000);
    }

    #[test]
    fn test_payment_rows_are_excluded() {
        let csv_data = "\
Date,Description,Amount,Type
2024-01-15,AUTOPAY THANK YOU,500.00,Payment";

        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        let row = &outcome.records[0];
        assert!(row.excluded);
        assert_eq!(row.kind, TxnKind::Expense);
    }

    #[test]
    fn test_positive_adjustment_becomes_income() {
        let csv_data = "\
Date,Description,Amount,Type
2024-01-15,STATEMENT CREDIT,12.50,Adjustment
2024-01-16,FEE REVERSAL GONE WRONG,-12.50,Adjustment";

        let outcome = parser().parse(csv_data.as_bytes()).unwrap();
        assert_eq!(outcome.records[0].kind, TxnKind::Income);
        assert_eq!(
            outcome.records[0].category.as_deref(),
            Some("Credit Card Redemptions/Interest")
        );
        assert_eq!(outcome.records[1].kind, TxnKind::Expense);
    }

    #[test]
    fn test_date_format_order() {
        assert_eq!(
            parse_date("01/15/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date("01/15/24"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(
            parse_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date("  2024-01-15  "), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date(""), None);
    }
}
