//! Vocabulary flashcards.

use crate::speech::AudioClip;
use serde::{Deserialize, Serialize};

/// Definition and usage example returned by the generative service.
///
/// Both fields are optional on the wire; the card builder substitutes
/// localized defaults for missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDefinition {
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}

/// An image produced by the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data_base64: String,
}

/// Illustration attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    /// Inline image returned by the image model.
    Generated(GeneratedImage),
    /// Deterministic stock image used when image generation failed.
    Placeholder { url: String },
}

impl CardImage {
    /// Placeholder image for `word`. The same word always maps to the same URL.
    pub fn placeholder(word: &str) -> Self {
        CardImage::Placeholder {
            url: placeholder_url(word),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CardImage::Placeholder { .. })
    }

    /// Something an image element can load: a data URL or a remote URL.
    pub fn src(&self) -> String {
        match self {
            CardImage::Generated(image) => {
                format!("data:{};base64,{}", image.mime_type, image.data_base64)
            }
            CardImage::Placeholder { url } => url.clone(),
        }
    }
}

/// Seeded stock-photo URL for `word`.
pub fn placeholder_url(word: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/400/300",
        urlencoding::encode(word)
    )
}

/// A generated study card. Replaced wholesale on every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabCard {
    pub word: String,
    /// Uzbek translation.
    pub definition: String,
    /// Simple English example sentence.
    pub example: String,
    pub image: CardImage,
    /// Pronunciation, filled in once the learner asks for it.
    pub audio: Option<AudioClip>,
}

/// State of the vocabulary screen.
#[derive(Debug, Clone, Default)]
pub struct VocabView {
    current: Option<VocabCard>,
}

impl VocabView {
    pub fn card(&self) -> Option<&VocabCard> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn show(&mut self, card: VocabCard) {
        self.current = Some(card);
    }

    /// Attaches pronunciation audio to the card if it is still showing `word`.
    pub fn attach_audio(&mut self, word: &str, clip: AudioClip) -> bool {
        match self.current.as_mut() {
            Some(card) if card.word == word => {
                card.audio = Some(clip);
                true
            }
            _ => false,
        }
    }
}
