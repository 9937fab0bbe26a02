//! Filesystem-facing services: paths, configuration, secrets and audio output.

pub mod audio_player;
pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use audio_player::WavFilePlayer;
pub use config_service::ConfigService;
pub use paths::LinguaPaths;
pub use secret_service::SecretServiceImpl;
