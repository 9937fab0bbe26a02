//! Screens of the tutor UI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The screen the user is currently looking at.
///
/// Exactly one screen is active at a time. Switching screens never cancels an
/// outstanding request, but it does invalidate it (see [`crate::request`]).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Screen {
    /// Landing screen with shortcuts to the other screens.
    #[default]
    Home,
    /// Lesson catalog and lesson reader.
    Lessons,
    /// Conversation with the tutor.
    Chat,
    /// Flashcard lookup.
    Vocabulary,
    /// Multiple-choice quiz.
    Quiz,
}

impl Screen {
    /// Localized screen title as shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Bosh sahifa",
            Screen::Lessons => "Darslar",
            Screen::Chat => "AI Suhbat",
            Screen::Vocabulary => "Lug'at",
            Screen::Quiz => "Test",
        }
    }
}
