//! Application layer - Use cases and orchestration
//!
//! Contains the conversation state machine, the per-state handlers, the
//! error-isolation boundary, and the port definitions for the speech
//! collaborators. Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
