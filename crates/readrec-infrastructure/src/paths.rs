//! Unified path management for readrec configuration files.
//!
//! All readrec configuration lives under a single config directory so the
//! secret file and catalog override are always found in the same place.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/readrec/           # Config directory
//! ├── secret.json              # API keys (read-only, never written)
//! └── catalog.toml             # Optional genre/mood catalog override
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for readrec.
pub struct ReadrecPaths;

impl ReadrecPaths {
    /// Returns the readrec configuration directory.
    ///
    /// Uses the platform config directory (XDG on Linux, Application Support
    /// on macOS, AppData on Windows).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("readrec"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to secret.json.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the optional catalog override file.
    pub fn catalog_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("catalog.toml"))
    }
}
