//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the local
//! speech providers, and carries the ambient plumbing: configuration
//! loading, tracing initialisation, retry, and the speech backend registry.

pub mod adapters;
pub mod config;
pub mod registry;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ConversationAppConfig, SpeechAppConfig};
pub use registry::{SpeechBackend, build_conversation_ports, build_speech_service};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_tracing};
