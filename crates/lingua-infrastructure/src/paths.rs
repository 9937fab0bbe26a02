//! Unified path management for lingua configuration files.
//!
//! ```text
//! ~/.config/lingua/            # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/lingua/       # Data directory
//! └── audio/                   # Pronunciation files (word-timestamp.wav)
//! ```

use lingua_core::config::{GeminiSecret, SecretConfig};
use std::path::PathBuf;

const APP_DIR: &str = "lingua";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for lingua.
pub struct LinguaPaths;

impl LinguaPaths {
    /// Returns the lingua configuration directory (e.g. `~/.config/lingua/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the lingua data directory (e.g. `~/.local/share/lingua/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the directory pronunciation files are written to by default.
    pub fn audio_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("audio"))
    }

    /// Ensures the secret file exists, creating it with an empty template if
    /// it doesn't.
    ///
    /// On Unix the new file is created with permissions 600.
    pub fn ensure_secret_file(secret_path: PathBuf) -> Result<PathBuf, std::io::Error> {
        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: String::new(),
                model_name: None,
            }),
        };
        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(std::io::Error::other)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let config_dir = LinguaPaths::config_dir().unwrap();
        assert!(config_dir.ends_with(APP_DIR));

        let config_file = LinguaPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let secret_file = LinguaPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        assert!(secret_file.starts_with(&config_dir));
    }

    #[test]
    fn test_audio_dir_under_data_dir() {
        let audio_dir = LinguaPaths::audio_dir().unwrap();
        assert!(audio_dir.ends_with("audio"));
        assert!(audio_dir.starts_with(LinguaPaths::data_dir().unwrap()));
    }

    #[test]
    fn test_ensure_secret_file_writes_template_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("secret.json");

        let created = LinguaPaths::ensure_secret_file(path.clone()).unwrap();
        assert_eq!(created, path);
        let template: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(template.gemini.unwrap().api_key, "");

        std::fs::write(&path, r#"{"gemini":{"api_key":"kept"}}"#).unwrap();
        LinguaPaths::ensure_secret_file(path.clone()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("kept"));
    }
}
