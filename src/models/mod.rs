//! Core data models for BudgetBook
//!
//! Contains the fundamental types: monetary amounts and ledger transactions.

pub mod money;
pub mod transaction;

pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionUpdate, TxnKind};
