//! Catalog override file storage.
//!
//! Loads an optional genre/mood catalog from ~/.config/readrec/catalog.toml.
//! When the file is absent the built-in presets are used instead (decided at
//! the service layer, not here).
//!
//! # File format
//!
//! ```toml
//! [[genre]]
//! name = "Fantasy"
//! moods = ["Whimsical", "Epic"]
//!
//! [[genre]]
//! name = "Horror"
//! moods = ["Creepy"]
//! ```

use crate::paths::ReadrecPaths;
use readrec_core::catalog::{Catalog, GenreEntry};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during catalog storage operations.
#[derive(Debug)]
pub enum CatalogStorageError {
    /// Catalog file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    ParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for CatalogStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogStorageError::NotFound(path) => {
                write!(f, "Catalog file not found at: {}", path.display())
            }
            CatalogStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            CatalogStorageError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            CatalogStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
        }
    }
}

impl std::error::Error for CatalogStorageError {}

impl From<toml::de::Error> for CatalogStorageError {
    fn from(e: toml::de::Error) -> Self {
        CatalogStorageError::ParseError(e)
    }
}

/// On-disk schema for catalog.toml.
#[derive(Debug, Deserialize)]
struct CatalogRoot {
    #[serde(rename = "genre", default)]
    genres: Vec<GenreRow>,
}

#[derive(Debug, Deserialize)]
struct GenreRow {
    name: String,
    #[serde(default)]
    moods: Vec<String>,
}

/// Storage for the catalog override file (catalog.toml).
///
/// Read-only, like the secret storage: the catalog is configuration, never
/// mutated by the application.
pub struct CatalogStorage {
    path: PathBuf,
}

impl CatalogStorage {
    /// Creates a new CatalogStorage with the default path.
    pub fn new() -> Result<Self, CatalogStorageError> {
        let path =
            ReadrecPaths::catalog_file().map_err(|_| CatalogStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new CatalogStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// True if the catalog file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the catalog from the TOML file.
    ///
    /// # Returns
    ///
    /// - `Ok(Catalog)`: Successfully loaded and parsed
    /// - `Err(CatalogStorageError::NotFound)`: File doesn't exist
    /// - `Err(CatalogStorageError::ParseError)`: Invalid TOML format
    pub fn load(&self) -> Result<Catalog, CatalogStorageError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogStorageError::NotFound(self.path.clone())
            } else {
                CatalogStorageError::IoError(e)
            }
        })?;
        let root: CatalogRoot = toml::from_str(&content)?;

        let genres = root
            .genres
            .into_iter()
            .map(|row| GenreEntry {
                name: row.name,
                moods: row.moods,
            })
            .collect();

        Ok(Catalog::new(genres))
    }

    /// Returns the path to the catalog file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
