//! Secret service implementation.
//!
//! Reads `secret.json` once and caches it. The Gemini API key can be
//! supplied through the environment instead, which takes precedence over the
//! file.

use crate::paths::LinguaPaths;
use lingua_core::config::{GeminiSecret, SecretConfig};
use lingua_core::secret::SecretService;
use lingua_core::{LinguaError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Environment variables checked for the Gemini API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Service for loading secret configuration from disk and environment.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_api_key: Option<String>,
    /// Cached secret config loaded from storage.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Uses the default secret path and the process environment.
    pub fn try_default() -> Result<Self> {
        let path = LinguaPaths::secret_file()
            .map_err(|e| LinguaError::config(format!("Failed to get secret path: {e}")))?;
        Ok(Self::new(path, api_key_from_env()))
    }

    /// Creates a service reading `path`, with an optional API key override.
    pub fn new(path: PathBuf, env_api_key: Option<String>) -> Self {
        Self {
            path,
            env_api_key,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_file(&self) -> Result<SecretConfig> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                LinguaError::config(format!(
                    "Failed to parse secret file at {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SecretConfig::default()),
            Err(err) => Err(LinguaError::io(format!(
                "Failed to read secret file at {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}

/// First non-empty API key found in [`API_KEY_ENV_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let mut loaded = self.read_file().await?;
        if let Some(api_key) = &self.env_api_key {
            debug!("Using Gemini API key from environment");
            let model_name = loaded.gemini.as_ref().and_then(|g| g.model_name.clone());
            loaded.gemini = Some(GeminiSecret {
                api_key: api_key.clone(),
                model_name,
            });
        }

        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}
