//! BudgetBook - Terminal-based personal finance ledger
//!
//! This library provides the core functionality for the BudgetBook
//! application: deduplicated ingestion of bank-statement CSVs into a durable
//! ledger, preference-driven categorization, and deterministic monthly
//! summary tables.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and the configuration repository
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions)
//! - `ingest`: Statement parsing, classification rules, identity assignment
//! - `storage`: JSON file storage layer (ledger, locks, goals)
//! - `services`: Business logic layer (import, categorization, edits)
//! - `reports`: Summary tables and goal progress
//! - `export`: CSV/JSON dumps and the summary sheet
//! - `display`: Terminal tables and value formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetbook::config::{BudgetPaths, ConfigRepository};
//! use budgetbook::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let mut storage = Storage::new(paths.clone())?;
//! storage.load_all()?;
//! let config = ConfigRepository::new(paths);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
