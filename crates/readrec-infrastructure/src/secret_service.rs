//! Secret service implementation.
//!
//! Loads API keys from secret.json with an environment override, and caches
//! the result so the configuration is read once per process.

use readrec_core::config::{GeminiConfig, SecretConfig};
use readrec_core::secret::SecretService;
use std::sync::{Arc, RwLock};

use crate::storage::secret_storage::{SecretStorage, SecretStorageError};

/// Environment variable that overrides (or stands in for) the configured
/// Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for managing secret configuration.
///
/// Resolution order for the Gemini API key:
/// 1. `GEMINI_API_KEY` environment variable
/// 2. `gemini.api_key` in secret.json
///
/// The merged configuration is cached after the first load. Key material is
/// never logged and never included in returned error messages.
#[derive(Clone)]
pub struct SecretServiceImpl {
    /// Cached secret config loaded from storage.
    /// Uses RwLock for thread-safe lazy loading.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    storage: Arc<SecretStorage>,
}

impl SecretServiceImpl {
    /// Creates a service reading from the default secret.json location.
    pub fn new() -> Result<Self, SecretStorageError> {
        Ok(Self::with_storage(SecretStorage::new()?))
    }

    /// Creates a service over a specific storage (for testing).
    pub fn with_storage(storage: SecretStorage) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            storage: Arc::new(storage),
        }
    }

    /// Loads the secrets from storage if not already cached.
    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self.secrets.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        // A missing file is fine when the env var is set; any other storage
        // failure is reported (without file contents).
        let mut config = match self.storage.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(_)) => SecretConfig::default(),
            Err(e) => return Err(format!("Failed to load secret configuration: {}", e)),
        };

        if let Ok(key) = std::env::var(GEMINI_API_KEY_ENV) {
            if !key.trim().is_empty() {
                match config.gemini.as_mut() {
                    Some(gemini) => gemini.api_key = key,
                    None => {
                        config.gemini = Some(GeminiConfig {
                            api_key: key,
                            model_name: None,
                        });
                    }
                }
            }
        }

        if config.gemini.is_none() {
            return Err(format!(
                "No Gemini credentials: set {} or add a gemini section to {}",
                GEMINI_API_KEY_ENV,
                self.storage.path().display()
            ));
        }

        {
            let mut write_lock = self.secrets.write().unwrap();
            *write_lock = Some(config.clone());
        }

        Ok(config)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secrets_available(&self) -> bool {
        self.load_secrets_internal().is_ok()
    }
}
