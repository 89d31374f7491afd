//! Echo responder - Default reply generator that repeats the transcript

use crate::ports::ResponseGenerator;

/// Reply used when nothing intelligible was heard
pub const NOT_UNDERSTOOD_REPLY: &str = "I couldn't understand what you said.";

/// Prefix for echoed transcripts
pub const ECHO_PREFIX: &str = "I heard you say: ";

/// Replies by echoing the transcript back to the speaker
#[derive(Debug, Clone, Default)]
pub struct EchoResponder;

impl EchoResponder {
    /// Create a new echo responder
    pub const fn new() -> Self {
        Self
    }
}

impl ResponseGenerator for EchoResponder {
    fn respond(&self, transcript: &str) -> String {
        let heard = transcript.trim();
        if heard.is_empty() {
            NOT_UNDERSTOOD_REPLY.to_string()
        } else {
            format!("{ECHO_PREFIX}{heard}")
        }
    }
}
