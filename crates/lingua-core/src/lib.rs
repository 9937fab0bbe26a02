//! Domain model and state machines of the Lingua English tutor.
//!
//! This crate holds no I/O. The generative service, secret storage and audio
//! playback are reached through the traits in [`generation`], [`secret`] and
//! [`speech`].

pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod lesson;
pub mod notice;
pub mod quiz;
pub mod request;
pub mod screen;
pub mod secret;
pub mod speech;
pub mod texts;
pub mod vocab;

// Re-export common error type
pub use error::{LinguaError, Result};
pub use request::{Delivery, Feature, RequestTicket, RequestTracker, TicketState};
pub use screen::Screen;
