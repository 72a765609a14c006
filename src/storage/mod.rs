//! Storage layer
//!
//! A single SQLite file holds the catalog and all account data. Stores share
//! one pooled [`Database`]; the catalog store owns the SQL side of search
//! while the search module owns the semantics.

pub mod accounts;
pub mod catalog;
pub mod database;

use crate::catalog::seed::seed_vehicles;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use accounts::{AccountStore, Post, Review, User};
pub use catalog::CatalogStore;
pub use database::{Database, DbPool, DbStats};

/// Storage manager coordinating catalog and account access
pub struct StorageManager {
    pub catalog: CatalogStore,
    pub accounts: AccountStore,
    database: Arc<Database>,
    base_path: PathBuf,
}

impl StorageManager {
    /// Open storage rooted at the given data directory
    pub fn new(base_path: PathBuf) -> Result<Self> {
        let db_path = base_path.join("wheelhouse.db");
        let database = Arc::new(Database::new(&db_path)?);

        Ok(Self {
            catalog: CatalogStore::new(database.clone()),
            accounts: AccountStore::new(database.clone()),
            database,
            base_path,
        })
    }

    /// Load the seed catalog when the vehicles table is empty; returns the
    /// number of vehicles inserted (0 when already seeded).
    pub fn seed_if_empty(&self) -> Result<usize> {
        if self.catalog.count()? > 0 {
            return Ok(0);
        }
        let inserted = self.catalog.insert(&seed_vehicles())?;
        tracing::info!("Seeded catalog with {} vehicles", inserted);
        Ok(inserted)
    }

    /// Force-load the seed catalog, replacing rows with matching ids
    pub fn seed(&self) -> Result<usize> {
        self.catalog.insert(&seed_vehicles())
    }

    /// Path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("wheelhouse.db")
    }

    /// Data directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Combined statistics
    pub fn stats(&self) -> Result<DbStats> {
        self.database.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageManager::new(temp_dir.path().to_path_buf()).unwrap();
        assert!(storage.db_path().exists());
    }

    #[test]
    fn test_seed_if_empty_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageManager::new(temp_dir.path().to_path_buf()).unwrap();

        let first = storage.seed_if_empty().unwrap();
        assert!(first > 0);
        assert_eq!(storage.seed_if_empty().unwrap(), 0);
        assert_eq!(storage.stats().unwrap().vehicle_count, first);
    }
}
