//! Local playback of pronunciation audio.
//!
//! The speech model returns raw 16-bit mono PCM. `WavFilePlayer` wraps it in
//! a WAV container, writes it to the audio directory and, if a player command
//! is configured, runs that command on the file and waits for it to exit.

use chrono::Utc;
use lingua_core::config::AudioSettings;
use lingua_core::speech::{AudioClip, AudioPlayer};
use lingua_core::{LinguaError, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

const BITS_PER_SAMPLE: u16 = 16;
const CHANNELS: u16 = 1;

/// Writes clips to disk and optionally hands them to an external player.
#[derive(Debug, Clone)]
pub struct WavFilePlayer {
    output_dir: PathBuf,
    player_command: Option<Vec<String>>,
}

impl WavFilePlayer {
    pub fn new(output_dir: impl Into<PathBuf>, player_command: Option<&str>) -> Self {
        let player_command = player_command
            .map(|command| {
                command
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|parts| !parts.is_empty());
        Self {
            output_dir: output_dir.into(),
            player_command,
        }
    }

    /// Builds a player from `[audio]` settings, falling back to `default_dir`
    /// when no output directory is configured.
    pub fn from_settings(settings: &AudioSettings, default_dir: PathBuf) -> Self {
        Self::new(
            settings.output_dir.clone().unwrap_or(default_dir),
            settings.player_command.as_deref(),
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn file_path(&self, word: &str, clip: &AudioClip) -> PathBuf {
        let stem: String = word
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let extension = if clip.is_raw_pcm() {
            "wav"
        } else {
            extension_for(&clip.mime_type)
        };
        self.output_dir.join(format!(
            "{}-{}.{}",
            stem,
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            extension
        ))
    }

    async fn run_player(&self, path: &Path) -> Result<()> {
        let Some((program, args)) = self.player_command.as_ref().and_then(|c| c.split_first())
        else {
            return Ok(());
        };

        debug!(program = %program, path = %path.display(), "Starting audio player");
        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .await
            .map_err(|e| LinguaError::io(format!("Failed to start audio player '{program}': {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(LinguaError::io(format!(
                "Audio player '{program}' exited with {status}"
            )))
        }
    }
}

#[async_trait::async_trait]
impl AudioPlayer for WavFilePlayer {
    async fn play(&self, word: &str, clip: &AudioClip) -> Result<Option<PathBuf>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.file_path(word, clip);
        let bytes = if clip.is_raw_pcm() {
            wav_bytes(&clip.data, clip.sample_rate())
        } else {
            clip.data.clone()
        };
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), "Wrote pronunciation audio");

        self.run_player(&path).await?;
        Ok(Some(path))
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" => "ogg",
        _ => "bin",
    }
}

/// Wraps 16-bit little-endian mono PCM in a canonical 44-byte WAV header.
pub fn wav_bytes(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}
