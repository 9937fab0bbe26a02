//! Gemini REST implementation of the tutor's generation service.

pub mod gemini_api_client;
pub mod prompts;

pub use gemini_api_client::GeminiApiClient;
