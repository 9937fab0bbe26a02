//! Pronunciation audio and local playback.

use crate::error::Result;
use std::path::PathBuf;

/// Default sample rate of the speech model's raw PCM output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Decoded speech audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// `true` for raw 16-bit PCM (`audio/L16`, `audio/pcm`), which needs a
    /// container before most players accept it.
    pub fn is_raw_pcm(&self) -> bool {
        let essence = self.mime_type.split(';').next().unwrap_or("").trim();
        essence.eq_ignore_ascii_case("audio/L16") || essence.eq_ignore_ascii_case("audio/pcm")
    }

    /// Sample rate declared in the mime type (`audio/L16;rate=24000`), or the
    /// speech model default.
    pub fn sample_rate(&self) -> u32 {
        self.mime_type
            .split(';')
            .filter_map(|param| param.trim().strip_prefix("rate="))
            .find_map(|rate| rate.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }
}

/// Plays decoded audio on the local machine.
#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Plays `clip` for `word`, returning once playback has finished.
    ///
    /// Returns the file the clip was written to, if the player writes one.
    async fn play(&self, word: &str, clip: &AudioClip) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_from_mime_type() {
        let clip = AudioClip::new(vec![], "audio/L16;codec=pcm;rate=16000");
        assert_eq!(clip.sample_rate(), 16_000);

        let clip = AudioClip::new(vec![], "audio/L16");
        assert_eq!(clip.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert!(clip.is_raw_pcm());
        assert!(!AudioClip::new(vec![], "audio/wav").is_raw_pcm());
    }
}
