//! Error types for the Lingua tutor.

use crate::request::Feature;
use thiserror::Error;

/// A shared error type for the entire Lingua workspace.
///
/// Upstream failures come in two kinds only: the service could not be reached
/// or answered with an error status (`Service`), or it answered with something
/// that could not be decoded (`MalformedResponse`). Both are handled the same
/// way by the controller, the split exists for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinguaError {
    /// A request of the same kind is still outstanding.
    #[error("A {feature} request is already in progress")]
    Busy { feature: Feature },

    /// The user submitted an empty input; nothing was sent upstream.
    #[error("Empty input for {feature}")]
    EmptyInput { feature: Feature },

    /// The action is not valid in the current screen state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Network or HTTP-level failure talking to the generative service.
    #[error("Service error{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Service {
        status_code: Option<u16>,
        message: String,
    },

    /// The generative service answered with something we could not decode.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LinguaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Service error
    pub fn service(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Busy error
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Check if this is an EmptyInput error
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput { .. })
    }

    /// Check if this error came from the upstream service, either as a
    /// transport/status failure or as an undecodable answer.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::MalformedResponse(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LinguaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LinguaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LinguaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LinguaError>`.
pub type Result<T> = std::result::Result<T, LinguaError>;
