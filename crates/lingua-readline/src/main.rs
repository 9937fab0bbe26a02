use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lingua_application::{GenerationClient, TutorSession};
use lingua_core::secret::SecretService;
use lingua_infrastructure::secret_service::api_key_from_env;
use lingua_infrastructure::{ConfigService, LinguaPaths, SecretServiceImpl, WavFilePlayer};
use lingua_interaction::GeminiApiClient;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::info;

mod commands;
mod helper;
mod logging;
mod render;
mod repl;

use repl::{Event, Repl};

#[derive(Parser, Debug)]
#[command(name = "lingua")]
#[command(version, about = "AI English tutor for Uzbek speakers", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/lingua/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Secret file holding the Gemini API key (default: ~/.config/lingua/secret.json)
    #[arg(long, value_name = "PATH")]
    secret: Option<PathBuf>,

    /// Log filter such as `info` or `lingua_application=debug`; RUST_LOG wins
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Overrides the text model used for chat, lessons, quizzes and definitions
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path),
        None => {
            let service = ConfigService::try_default()?;
            service.ensure_config_file()?;
            service
        }
    };
    let config = config_service.load()?;

    logging::init(cli.log_level.as_deref().unwrap_or(config.logging.level.as_str()))?;
    info!(path = %config_service.path().display(), "Configuration loaded");

    let secret_path = match cli.secret {
        Some(path) => path,
        None => LinguaPaths::secret_file()?,
    };
    let secret_path = LinguaPaths::ensure_secret_file(secret_path)
        .context("Failed to create the secret file")?;
    let secrets = SecretServiceImpl::new(secret_path.clone(), api_key_from_env())
        .load_secrets()
        .await?;

    let mut gemini = GeminiApiClient::from_config(&config, &secrets).with_context(|| {
        format!(
            "Set GEMINI_API_KEY or put your API key into {}",
            secret_path.display()
        )
    })?;
    if let Some(model) = cli.model {
        gemini = gemini.with_text_model(model);
    }
    info!(model = %gemini.settings().text_model, "Gemini client ready");

    let player = WavFilePlayer::from_settings(&config.audio, LinguaPaths::audio_dir()?);
    let client = GenerationClient::new(Arc::new(gemini), config.quiz.question_count);
    let session = Arc::new(TutorSession::new(client, Arc::new(player)));

    let (event_tx, event_rx) = mpsc::channel::<Event>(32);
    let printer = repl::spawn_printer(session.clone(), event_rx);

    Repl::new(
        session,
        event_tx,
        Duration::from_millis(config.quiz.reveal_delay_ms),
    )
    .run()
    .await?;

    // In-flight requests still hold senders; give them a moment, then leave.
    let _ = timeout(Duration::from_secs(2), printer).await;

    Ok(())
}
