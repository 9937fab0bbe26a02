//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the learner.
    User,
    /// Message produced by the tutor.
    Assistant,
}

impl MessageRole {
    /// Role name expected by the generative service.
    pub fn wire_name(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }
}

/// A single message in the conversation log.
///
/// Messages are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (UUID v4).
    pub id: String,
    /// The author of the message.
    pub role: MessageRole,
    /// Message body; may contain markdown.
    pub text: String,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }
}
