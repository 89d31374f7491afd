//! Domain layer for Parley
//!
//! Contains the conversation model: states, the per-run context threaded
//! through the state handlers, the terminal report, and cycle normalization.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
