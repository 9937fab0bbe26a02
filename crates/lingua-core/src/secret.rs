//! Secret management service trait.

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for loading API credentials.
///
/// Implementations must never log or embed secret values in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Checks if the secret file exists.
    async fn secret_file_exists(&self) -> bool;
}
