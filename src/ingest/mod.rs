//! Statement ingestion pipeline
//!
//! Turns raw CSV statement exports into ledger-ready transactions in three
//! steps: parse rows into candidate records, classify them with per-source
//! rules, and assign stable content-derived identifiers.

pub mod identity;
pub mod parser;
pub mod rules;

pub use identity::assign_external_ids;
pub use parser::{CandidateTransaction, ParseOutcome, StatementParser};
pub use rules::{ClassificationRule, RuleAction, SourceProfile};
