//! Configuration repository
//!
//! Holds the preference map, category lists, and account list behind explicit
//! `load`/`save` contracts. Each value has two on-disk homes: an authoritative
//! copy in the state directory (written by the app) and a user-facing mirror
//! in the config directory (editable, downloadable). On load the state copy
//! wins; saves write through to both.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{BudgetError, BudgetResult};
use crate::storage::file_io::write_json_atomic;

use super::paths::BudgetPaths;

/// Persistent description→category mapping
pub type PreferenceMap = BTreeMap<String, String>;

/// Default account names offered for manual entry
const DEFAULT_ACCOUNTS: [&str; 5] = ["Chase", "Venmo", "BOA", "Cash", "Other"];

/// Repository for all user configuration
pub struct ConfigRepository {
    paths: BudgetPaths,
}

impl ConfigRepository {
    /// Create a new repository over the given paths
    pub fn new(paths: BudgetPaths) -> Self {
        Self { paths }
    }

    /// Load the preference map (state copy wins over the mirror file)
    pub fn load_preferences(&self) -> BudgetResult<PreferenceMap> {
        self.load_with_precedence(
            &self.paths.preferences_state_file(),
            &self.paths.preferences_file(),
        )
    }

    /// Save the preference map, writing through to state and mirror
    pub fn save_preferences(&self, prefs: &PreferenceMap) -> BudgetResult<()> {
        self.save_with_mirror(
            prefs,
            &self.paths.preferences_state_file(),
            &self.paths.preferences_file(),
        )
    }

    /// Replace the preference map from raw JSON text
    ///
    /// Validates that the payload is an object of strings before anything is
    /// written; on failure the stored mapping is left untouched.
    pub fn import_preferences(&self, json_text: &str) -> BudgetResult<usize> {
        let value: serde_json::Value = serde_json::from_str(json_text)
            .map_err(|e| BudgetError::Validation(format!("Invalid preferences JSON: {}", e)))?;

        let object = value.as_object().ok_or_else(|| {
            BudgetError::Validation("preferences.json must be a JSON object".into())
        })?;

        let mut prefs = PreferenceMap::new();
        for (description, category) in object {
            let category = category.as_str().ok_or_else(|| {
                BudgetError::Validation(format!(
                    "preference for {:?} must be a string category",
                    description
                ))
            })?;
            prefs.insert(description.clone(), category.to_string());
        }

        self.save_preferences(&prefs)?;
        Ok(prefs.len())
    }

    /// Load the ordered expense-category list
    pub fn load_expense_categories(&self) -> BudgetResult<Vec<String>> {
        self.load_with_precedence(
            &self.paths.expense_categories_state_file(),
            &self.paths.expense_categories_file(),
        )
    }

    /// Save the ordered expense-category list
    pub fn save_expense_categories(&self, cats: &[String]) -> BudgetResult<()> {
        self.save_with_mirror(
            &cats.to_vec(),
            &self.paths.expense_categories_state_file(),
            &self.paths.expense_categories_file(),
        )
    }

    /// Load the ordered income-category list
    pub fn load_income_categories(&self) -> BudgetResult<Vec<String>> {
        self.load_with_precedence(
            &self.paths.income_categories_state_file(),
            &self.paths.income_categories_file(),
        )
    }

    /// Save the ordered income-category list
    pub fn save_income_categories(&self, cats: &[String]) -> BudgetResult<()> {
        self.save_with_mirror(
            &cats.to_vec(),
            &self.paths.income_categories_state_file(),
            &self.paths.income_categories_file(),
        )
    }

    /// Load the account-name list, falling back to the built-in defaults
    pub fn load_accounts(&self) -> Vec<String> {
        match read_optional::<Vec<String>>(&self.paths.accounts_file()) {
            Ok(Some(accounts)) if !accounts.is_empty() => accounts,
            Ok(_) => DEFAULT_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
            Err(e) => {
                warn!(error = %e, "accounts.json unreadable, using defaults");
                DEFAULT_ACCOUNTS.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    /// Save the account-name list
    pub fn save_accounts(&self, accounts: &[String]) -> BudgetResult<()> {
        write_json_atomic(self.paths.accounts_file(), &accounts.to_vec())
    }

    fn load_with_precedence<T>(&self, state_path: &Path, mirror_path: &Path) -> BudgetResult<T>
    where
        T: DeserializeOwned + Default,
    {
        // The state copy is app-written; a parse failure there is a real error.
        if state_path.exists() {
            return read_required(state_path);
        }

        // The mirror is user-edited; malformed content falls back to the
        // default with a warning so startup still succeeds.
        match read_optional(mirror_path) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(T::default()),
            Err(e) => {
                warn!(path = %mirror_path.display(), error = %e, "malformed config file ignored");
                Ok(T::default())
            }
        }
    }

    fn save_with_mirror<T>(&self, value: &T, state_path: &Path, mirror_path: &Path) -> BudgetResult<()>
    where
        T: Serialize,
    {
        write_json_atomic(state_path, value)?;
        // Mirror write is best-effort; the state copy is authoritative.
        if let Err(e) = write_json_atomic(mirror_path, value) {
            warn!(path = %mirror_path.display(), error = %e, "could not update config mirror");
        }
        Ok(())
    }
}

fn read_required<T: DeserializeOwned>(path: &Path) -> BudgetResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| BudgetError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| BudgetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> BudgetResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| BudgetError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| BudgetError::Json(format!("Failed to parse {}: {}", path.display(), e)))?;
    Ok(Some(value))
}
