//! Contract of the external generative service.
//!
//! Each method issues exactly one outbound call. Implementations report every
//! failure as an error; turning failures into user-facing fallbacks is the
//! caller's job.

use crate::chat::HistoryTurn;
use crate::error::Result;
use crate::lesson::LessonLevel;
use crate::quiz::QuizQuestion;
use crate::vocab::{GeneratedImage, WordDefinition};

/// Base64 audio as returned by the speech model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub mime_type: String,
    pub data_base64: String,
}

#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Continues the conversation. `history` holds the turns before `message`.
    ///
    /// Returns `None` if the service answered without any text.
    async fn send_chat(&self, history: &[HistoryTurn], message: &str) -> Result<Option<String>>;

    /// Generates a markdown lesson for `title` at `level`.
    async fn generate_lesson(&self, title: &str, level: LessonLevel) -> Result<String>;

    /// Generates `count` multiple-choice questions about `topic`.
    async fn generate_quiz(&self, topic: &str, count: usize) -> Result<Vec<QuizQuestion>>;

    /// Translates `word` and produces an example sentence.
    async fn define_word(&self, word: &str) -> Result<WordDefinition>;

    /// Draws an illustration for `word`. `None` if the model returned no image.
    async fn generate_image(&self, word: &str) -> Result<Option<GeneratedImage>>;

    /// Reads `text` aloud. `None` if the model returned no audio.
    async fn synthesize_speech(&self, text: &str) -> Result<Option<EncodedAudio>>;
}
