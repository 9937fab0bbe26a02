//! Application layer: the fallback façade over the generation service and
//! the tutor's view/state controller.

pub mod generation_client;
pub mod tutor_session;

pub use generation_client::{Fetched, GenerationClient};
pub use tutor_session::{TutorSession, TutorState};
