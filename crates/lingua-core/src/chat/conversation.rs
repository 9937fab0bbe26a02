//! The conversation log shown on the chat screen.

use super::message::{ChatMessage, MessageRole};
use crate::texts::CHAT_GREETING;

/// One prior turn as sent to the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: MessageRole,
    pub text: String,
}

/// Ordered, append-only conversation log.
///
/// Every conversation opens with the tutor's greeting. Messages are never
/// edited or removed.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(CHAT_GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Appends a message and returns a reference to it.
    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// The log as history turns, oldest first.
    ///
    /// A user message that never got a reply (its answer was dropped) is left
    /// out, so the turns keep alternating.
    pub fn history(&self) -> Vec<HistoryTurn> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(i, message)| {
                message.role != MessageRole::User
                    || self
                        .messages
                        .get(i + 1)
                        .is_some_and(|next| next.role == MessageRole::Assistant)
            })
            .map(|(_, message)| HistoryTurn {
                role: message.role,
                text: message.text.clone(),
            })
            .collect()
    }
}
