//! Pacing port - Suspends the conversation between turns

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Port for the waiting pause between a machine turn and the next capture
///
/// Infallible by contract: pacing must never stop a conversation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PacingPort: Send + Sync {
    /// Suspend for the given duration
    async fn sleep(&self, duration: Duration);
}
