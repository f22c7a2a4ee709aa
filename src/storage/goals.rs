//! Goal repository
//!
//! Persists per-category monthly spending targets keyed by year in
//! goals.json. Goals are independent of transactions and only read by the
//! reporting layer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::Money;

use super::file_io::{read_json, write_json_atomic};

/// Repository for (year, category) -> monthly goal persistence
pub struct GoalRepository {
    path: PathBuf,
    /// year -> category -> monthly target
    data: RwLock<BTreeMap<i32, BTreeMap<String, Money>>>,
}

impl GoalRepository {
    /// Create a new goal repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load goals from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BTreeMap<i32, BTreeMap<String, Money>> = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;
        Ok(())
    }

    /// Save goals to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        write_json_atomic(&self.path, &*data)
    }

    /// Insert or replace the monthly goal for (year, category)
    pub fn upsert_goal(
        &self,
        year: i32,
        category: &str,
        monthly: Money,
    ) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.entry(year)
            .or_default()
            .insert(category.to_string(), monthly);
        Ok(())
    }

    /// All goals for a year (empty map when none)
    pub fn goals_for_year(&self, year: i32) -> Result<BTreeMap<String, Money>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&year).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GoalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_and_query() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert_goal(2024, "Groceries", Money::from_cents(40000))
            .unwrap();
        repo.upsert_goal(2024, "Groceries", Money::from_cents(45000))
            .unwrap();
        repo.upsert_goal(2024, "Rent", Money::from_cents(120000))
            .unwrap();

        let goals = repo.goals_for_year(2024).unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals.get("Groceries"), Some(&Money::from_cents(45000)));
        assert!(repo.goals_for_year(2023).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert_goal(2024, "Rent", Money::from_cents(120000))
            .unwrap();
        repo.save().unwrap();

        let repo2 = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo2.load().unwrap();
        assert_eq!(
            repo2.goals_for_year(2024).unwrap().get("Rent"),
            Some(&Money::from_cents(120000))
        );
    }
}
