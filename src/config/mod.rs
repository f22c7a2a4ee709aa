//! Configuration and path management for BudgetBook

pub mod paths;
pub mod repository;

pub use paths::BudgetPaths;
pub use repository::ConfigRepository;
