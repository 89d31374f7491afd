//! Pacing adapter backed by the tokio timer

use std::time::Duration;

use application::ports::PacingPort;
use async_trait::async_trait;

/// Sleeps on the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl TokioPacer {
    /// Create a new pacer
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PacingPort for TokioPacer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
