//! Application services - Use case implementations

mod conversation_service;
mod echo_responder;
mod speech_service;
mod turn_handlers;
mod turn_isolation;

pub use conversation_service::{
    ConversationRequest, ConversationService, ConversationSettings, DEFAULT_LISTEN_DURATION,
    DEFAULT_WAIT_DURATION,
};
pub use echo_responder::{ECHO_PREFIX, EchoResponder, NOT_UNDERSTOOD_REPLY};
pub use speech_service::SpeechService;
pub use turn_handlers::{HandledTurn, handle_listening, handle_speaking, handle_waiting};
pub use turn_isolation::{Isolated, isolate};
