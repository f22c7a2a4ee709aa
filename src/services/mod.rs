//! Business logic layer
//!
//! Services tie the ingestion pipeline, configuration repository, and storage
//! together, and are the layer that enforces the locked-month guard on every
//! mutating entry point.

pub mod categorize;
pub mod import;
pub mod ledger;

pub use categorize::{normalize_description, ApplyOutcome, CategoryService, MappingOutcome, PendingGroup};
pub use import::{ImportOptions, ImportReport, ImportService};
pub use ledger::{EditOutcome, LedgerService, ManualEntry};
