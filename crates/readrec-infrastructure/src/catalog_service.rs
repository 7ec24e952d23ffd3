//! Catalog loading service.
//!
//! Resolves the genre/mood catalog at startup: the catalog.toml override if
//! present, the built-in presets otherwise.

use readrec_core::catalog::{Catalog, default_catalog};

use crate::storage::catalog_storage::{CatalogStorage, CatalogStorageError};

/// Loads the catalog, preferring the override file over the presets.
pub struct CatalogService {
    storage: CatalogStorage,
}

impl CatalogService {
    /// Creates a service reading from the default catalog.toml location.
    pub fn new() -> Result<Self, CatalogStorageError> {
        Ok(Self::with_storage(CatalogStorage::new()?))
    }

    /// Creates a service over a specific storage (for testing).
    pub fn with_storage(storage: CatalogStorage) -> Self {
        Self { storage }
    }

    /// Returns the effective catalog.
    ///
    /// A missing override file falls back to the presets silently; a present
    /// but malformed file is surfaced as an error rather than masked, so a
    /// typo in the override does not quietly change the option sets.
    pub fn load(&self) -> Result<Catalog, CatalogStorageError> {
        match self.storage.load() {
            Ok(catalog) => {
                tracing::info!(
                    path = %self.storage.path().display(),
                    genres = catalog.len(),
                    "loaded catalog override"
                );
                Ok(catalog)
            }
            Err(CatalogStorageError::NotFound(_)) => Ok(default_catalog()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_falls_back_to_presets() {
        let temp_dir = TempDir::new().unwrap();
        let storage = CatalogStorage::with_path(temp_dir.path().join("catalog.toml"));
        let service = CatalogService::with_storage(storage);

        let catalog = service.load().unwrap();
        assert_eq!(catalog, default_catalog());
    }

    #[test]
    fn test_override_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("catalog.toml");
        fs::write(
            &file_path,
            "[[genre]]\nname = \"Poetry\"\nmoods = [\"Quiet\"]\n",
        )
        .unwrap();

        let service = CatalogService::with_storage(CatalogStorage::with_path(file_path));
        let catalog = service.load().unwrap();
        assert_eq!(catalog.genre_labels(), vec!["Poetry"]);
    }

    #[test]
    fn test_malformed_override_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("catalog.toml");
        fs::write(&file_path, "[[genre]\n").unwrap();

        let service = CatalogService::with_storage(CatalogStorage::with_path(file_path));
        assert!(service.load().is_err());
    }
}
