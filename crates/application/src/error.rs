//! Application-level errors
//!
//! Collaborator failures (recording, transcription, synthesis, playback) are
//! recoverable: the conversation handlers swallow them and fall back. Every
//! other variant is fatal to a conversation run.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Microphone capture failed
    #[error("Recording failed: {0}")]
    Recording(String),

    /// Speech-to-text failed
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Text-to-speech failed
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Speaker playback failed
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Domain-level error (validation, illegal transition, cycle overrun)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The driver reached a state it cannot handle
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is a collaborator failure that a handler may
    /// replace with its fallback
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Recording(_) | Self::Transcription(_) | Self::Synthesis(_) | Self::Playback(_)
        )
    }
}
