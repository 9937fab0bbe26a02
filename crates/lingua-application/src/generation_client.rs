//! Fallback façade over the generation service.
//!
//! One method per user action. Upstream failures are logged and turned into
//! the static texts of [`lingua_core::texts`]; nothing is retried.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use lingua_core::Result;
use lingua_core::chat::HistoryTurn;
use lingua_core::generation::GenerationService;
use lingua_core::lesson::LessonTopic;
use lingua_core::quiz::QuizQuestion;
use lingua_core::speech::AudioClip;
use lingua_core::texts::{
    CHAT_EMPTY_REPLY, CHAT_FAILED, DEFINITION_MISSING, EXAMPLE_MISSING, LESSON_FAILED,
};
use lingua_core::vocab::{CardImage, VocabCard};
use std::sync::Arc;
use tracing::{error, warn};

/// A value from the service, or the fallback that replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    /// `true` if `value` is a fallback because the call failed.
    pub degraded: bool,
}

impl<T> Fetched<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    service: Arc<dyn GenerationService>,
    quiz_size: usize,
}

impl GenerationClient {
    pub fn new(service: Arc<dyn GenerationService>, quiz_size: usize) -> Self {
        Self {
            service,
            quiz_size: quiz_size.max(1),
        }
    }

    /// Tutor reply to `message`. Never empty.
    pub async fn chat_reply(&self, history: &[HistoryTurn], message: &str) -> Fetched<String> {
        match self.service.send_chat(history, message).await {
            Ok(Some(text)) => Fetched::ok(text),
            Ok(None) => {
                warn!("Chat reply was empty");
                Fetched::ok(CHAT_EMPTY_REPLY.to_string())
            }
            Err(err) => {
                error!(error = %err, "Chat error");
                Fetched::fallback(CHAT_FAILED.to_string())
            }
        }
    }

    /// Markdown body for `topic`.
    pub async fn lesson(&self, topic: &LessonTopic) -> Fetched<String> {
        match self.service.generate_lesson(topic.title, topic.level).await {
            Ok(markdown) => Fetched::ok(markdown),
            Err(err) => {
                error!(error = %err, topic = topic.title, "Lesson generation error");
                Fetched::fallback(LESSON_FAILED.to_string())
            }
        }
    }

    /// Questions about `topic`; empty on failure.
    pub async fn quiz(&self, topic: &str) -> Fetched<Vec<QuizQuestion>> {
        match self.service.generate_quiz(topic, self.quiz_size).await {
            Ok(questions) => Fetched::ok(questions),
            Err(err) => {
                error!(error = %err, topic, "Quiz generation error");
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Builds a flashcard for `word`.
    ///
    /// The definition call must succeed; the illustration is best effort and
    /// falls back to the placeholder image for `word`.
    pub async fn vocab_card(&self, word: &str) -> Result<VocabCard> {
        let definition = self.service.define_word(word).await.inspect_err(|err| {
            error!(error = %err, word, "Vocab error");
        })?;

        let image = match self.service.generate_image(word).await {
            Ok(Some(image)) => CardImage::Generated(image),
            Ok(None) => {
                warn!(word, "Image model returned no image, using placeholder");
                CardImage::placeholder(word)
            }
            Err(err) => {
                warn!(error = %err, word, "Image gen failed, using placeholder");
                CardImage::placeholder(word)
            }
        };

        Ok(VocabCard {
            word: word.to_string(),
            definition: non_blank(definition.definition)
                .unwrap_or_else(|| DEFINITION_MISSING.to_string()),
            example: non_blank(definition.example).unwrap_or_else(|| EXAMPLE_MISSING.to_string()),
            image,
            audio: None,
        })
    }

    /// Decoded pronunciation of `text`; `None` if it could not be produced.
    pub async fn speech(&self, text: &str) -> Option<AudioClip> {
        let encoded = match self.service.synthesize_speech(text).await {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                warn!("TTS returned no audio");
                return None;
            }
            Err(err) => {
                error!(error = %err, "TTS Error");
                return None;
            }
        };

        match BASE64_STANDARD.decode(encoded.data_base64.trim()) {
            Ok(data) if !data.is_empty() => Some(AudioClip::new(data, encoded.mime_type)),
            Ok(_) => {
                warn!("TTS returned an empty payload");
                None
            }
            Err(err) => {
                error!(error = %err, "TTS payload is not valid base64");
                None
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
