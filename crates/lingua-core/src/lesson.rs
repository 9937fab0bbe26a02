//! Lesson catalog and the lesson reader state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Difficulty level of a lesson topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum LessonLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A static catalog entry. Topics are fixed, never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonTopic {
    pub id: &'static str,
    pub title: &'static str,
    pub level: LessonLevel,
    pub description: &'static str,
}

const CATALOG: &[LessonTopic] = &[
    LessonTopic {
        id: "1",
        title: "Present Simple",
        level: LessonLevel::Beginner,
        description: "Kundalik ish-harakatlar haqida gapirish.",
    },
    LessonTopic {
        id: "2",
        title: "Past Simple",
        level: LessonLevel::Beginner,
        description: "O'tgan zamon fe'llari.",
    },
    LessonTopic {
        id: "3",
        title: "Future Tenses",
        level: LessonLevel::Intermediate,
        description: "Kelajak rejalari: Will va Going to.",
    },
    LessonTopic {
        id: "4",
        title: "Conditionals",
        level: LessonLevel::Intermediate,
        description: "Shart gaplar (If structures).",
    },
    LessonTopic {
        id: "5",
        title: "Phrasal Verbs",
        level: LessonLevel::Advanced,
        description: "Eng kerakli iborali fe'llar.",
    },
];

/// All lesson topics in display order.
pub fn catalog() -> &'static [LessonTopic] {
    CATALOG
}

/// Looks up a topic by id.
pub fn find_topic(id: &str) -> Option<&'static LessonTopic> {
    CATALOG.iter().find(|topic| topic.id == id)
}

/// Markdown body of a lesson, fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonContent {
    pub topic_id: String,
    pub markdown: String,
}

/// State of the lessons screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LessonView {
    /// The topic list.
    #[default]
    Catalog,
    /// A topic is open; `content` is `None` while it loads.
    Reading {
        topic: &'static LessonTopic,
        content: Option<LessonContent>,
    },
}

impl LessonView {
    /// Opens `topic`, discarding any previously loaded body.
    pub fn open(&mut self, topic: &'static LessonTopic) {
        *self = LessonView::Reading {
            topic,
            content: None,
        };
    }

    /// Stores the body for the open topic.
    ///
    /// Returns `false` (and stores nothing) if a different topic, or no topic,
    /// is open.
    pub fn fill(&mut self, content: LessonContent) -> bool {
        match self {
            LessonView::Reading {
                topic,
                content: slot,
            } if topic.id == content.topic_id => {
                *slot = Some(content);
                true
            }
            _ => false,
        }
    }

    pub fn back(&mut self) {
        *self = LessonView::Catalog;
    }

    pub fn open_topic(&self) -> Option<&'static LessonTopic> {
        match self {
            LessonView::Reading { topic, .. } => Some(topic),
            LessonView::Catalog => None,
        }
    }

    pub fn content(&self) -> Option<&LessonContent> {
        match self {
            LessonView::Reading { content, .. } => content.as_ref(),
            LessonView::Catalog => None,
        }
    }
}
