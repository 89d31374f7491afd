//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod pacing_port;
mod response_port;
mod speech_port;

use std::fmt;
use std::sync::Arc;

#[cfg(test)]
pub use pacing_port::MockPacingPort;
pub use pacing_port::PacingPort;
#[cfg(test)]
pub use response_port::MockResponseGenerator;
pub use response_port::ResponseGenerator;
#[cfg(test)]
pub use speech_port::{MockListeningPort, MockSpeakingPort};
pub use speech_port::{FileTranscriptionRequest, ListenRequest, ListeningPort, SpeakingPort};

/// The collaborators a conversation needs, composed explicitly by the caller
#[derive(Clone)]
pub struct ConversationPorts {
    /// Capture and transcription
    pub listener: Arc<dyn ListeningPort>,
    /// Synthesis and playback
    pub speaker: Arc<dyn SpeakingPort>,
    /// Waiting pause
    pub pacer: Arc<dyn PacingPort>,
    /// Reply text
    pub responder: Arc<dyn ResponseGenerator>,
}

impl ConversationPorts {
    /// Bundle the collaborators
    pub fn new(
        listener: Arc<dyn ListeningPort>,
        speaker: Arc<dyn SpeakingPort>,
        pacer: Arc<dyn PacingPort>,
        responder: Arc<dyn ResponseGenerator>,
    ) -> Self {
        Self {
            listener,
            speaker,
            pacer,
            responder,
        }
    }
}

impl fmt::Debug for ConversationPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationPorts").finish_non_exhaustive()
    }
}
