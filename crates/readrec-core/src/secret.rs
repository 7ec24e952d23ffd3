//! Secret management service trait.
//!
//! Defines the interface for loading secret configuration (API keys).

use crate::config::SecretConfig;

/// Service for managing secret configuration.
///
/// This trait defines the interface for loading API keys and other sensitive
/// configuration data from secure storage.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
/// - Secrets are loaded once at startup, not re-read per request
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded secrets
    /// - `Err(String)`: Failed to load (error message must not contain secrets)
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Checks if any secret source is available.
    async fn secrets_available(&self) -> bool;
}
