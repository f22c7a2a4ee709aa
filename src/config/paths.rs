//! Path management for BudgetBook
//!
//! Provides XDG-compliant path resolution for configuration, data, and
//! statement-import state.
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGETBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/budgetbook` or `~/.config/budgetbook`
//! 3. Windows: `%APPDATA%\budgetbook`

use std::path::PathBuf;

use crate::error::BudgetError;

/// Manages all paths used by BudgetBook
#[derive(Debug, Clone)]
pub struct BudgetPaths {
    /// Base directory for all BudgetBook data
    base_dir: PathBuf,
}

impl BudgetPaths {
    /// Create a new BudgetPaths instance
    ///
    /// Path resolution:
    /// 1. `BUDGETBOOK_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/budgetbook` or `~/.config/budgetbook`
    /// 3. Windows: `%APPDATA%\budgetbook`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var("BUDGETBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/budgetbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (ledger, locks, goals)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the config directory (user-editable mirror files)
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    /// Get the application-state directory (authoritative config copies)
    pub fn state_dir(&self) -> PathBuf {
        self.base_dir.join("state")
    }

    /// Get the path to ledger.json
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Get the path to locked_months.json
    pub fn locks_file(&self) -> PathBuf {
        self.data_dir().join("locked_months.json")
    }

    /// Get the path to goals.json
    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    /// Authoritative preference-map copy
    pub fn preferences_state_file(&self) -> PathBuf {
        self.state_dir().join("preferences.json")
    }

    /// User-facing preference-map mirror
    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir().join("preferences.json")
    }

    /// Authoritative expense-category list copy
    pub fn expense_categories_state_file(&self) -> PathBuf {
        self.state_dir().join("expense_categories.json")
    }

    /// User-facing expense-category list mirror
    pub fn expense_categories_file(&self) -> PathBuf {
        self.config_dir().join("expense_categories.json")
    }

    /// Authoritative income-category list copy
    pub fn income_categories_state_file(&self) -> PathBuf {
        self.state_dir().join("income_categories.json")
    }

    /// User-facing income-category list mirror
    pub fn income_categories_file(&self) -> PathBuf {
        self.config_dir().join("income_categories.json")
    }

    /// Account-name list (config only, no state copy)
    pub fn accounts_file(&self) -> PathBuf {
        self.config_dir().join("accounts.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.config_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create config directory: {}", e)))?;

        std::fs::create_dir_all(self.state_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create state directory: {}", e)))?;

        Ok(())
    }

    /// Check if BudgetBook has been initialized (ledger file exists)
    pub fn is_initialized(&self) -> bool {
        self.ledger_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("budgetbook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BudgetError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("budgetbook"))
}
