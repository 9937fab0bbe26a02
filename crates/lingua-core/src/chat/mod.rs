//! Chat domain module.
//!
//! - `message`: a single conversation entry (`ChatMessage`, `MessageRole`)
//! - `conversation`: the append-only conversation log (`Conversation`)

mod conversation;
mod message;

pub use conversation::{Conversation, HistoryTurn};
pub use message::{ChatMessage, MessageRole};
