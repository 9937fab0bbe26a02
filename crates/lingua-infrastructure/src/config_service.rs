//! Configuration service implementation.
//!
//! Loads `config.toml`. A missing file yields the defaults; a present but
//! invalid file is an error so typos don't silently fall back.

use crate::paths::LinguaPaths;
use lingua_core::config::AppConfig;
use lingua_core::{LinguaError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default path (`~/.config/lingua/config.toml`).
    pub fn try_default() -> Result<Self> {
        let path = LinguaPaths::config_file()
            .map_err(|e| LinguaError::config(format!("Failed to get config path: {e}")))?;
        Ok(Self::new(path))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content).map_err(|e| {
            LinguaError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;
        info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Writes the default configuration if no file exists yet.
    pub fn ensure_config_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| LinguaError::config(format!("Failed to serialize defaults: {e}")))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
