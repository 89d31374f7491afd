//! Domain-level errors

use thiserror::Error;

use crate::entities::ConversationState;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed (e.g. a non-numeric cycle count)
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A transition that the conversation state table does not allow
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: ConversationState,
        to: ConversationState,
    },

    /// Cycle accounting left the normalized bounds
    #[error("Cycle accounting violated: {completed} completed of {target} targeted")]
    CycleOverrun { completed: u64, target: u64 },
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
