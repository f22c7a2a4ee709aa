//! Custom error types for BudgetBook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for BudgetBook operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and uploaded configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// Statement is missing required columns; nothing is ingested
    #[error("Statement missing required columns {missing:?} (found: {found:?})")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for BudgetBook operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_missing_columns_error() {
        let err = BudgetError::MissingColumns {
            missing: vec!["date".into()],
            found: vec!["Description".into(), "Amount".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("date"));
        assert!(msg.contains("Description"));
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::transaction_not_found("abc123-1");
        assert_eq!(err.to_string(), "Transaction not found: abc123-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let budget_err: BudgetError = io_err.into();
        assert!(matches!(budget_err, BudgetError::Io(_)));
    }
}
