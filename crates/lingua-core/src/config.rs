//! Configuration types.
//!
//! `config.toml` holds non-secret settings; `secret.json` holds the API key.
//! Every field has a default so a missing or partial file still loads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Puck";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub quiz: QuizSettings,
    pub audio: AudioSettings,
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub speech_model: String,
    pub voice_name: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            voice_name: DEFAULT_VOICE.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QuizSettings {
    /// Questions requested per quiz.
    pub question_count: usize,
    /// How long the answer and explanation stay on screen before the next
    /// question, in milliseconds.
    pub reveal_delay_ms: u64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 5,
            reveal_delay_ms: 2000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AudioSettings {
    /// Where pronunciation files are written. Defaults to the data directory.
    pub output_dir: Option<PathBuf>,
    /// External command used to play a written file, e.g. `aplay` or
    /// `afplay`. The file path is appended as the last argument.
    pub player_command: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter when neither `--log-level` nor `RUST_LOG` is set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credentials
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
    /// Overrides `gemini.text_model` from `config.toml`.
    #[serde(default)]
    pub model_name: Option<String>,
}
