//! Response port - Turns a transcript into the machine's reply text

#[cfg(test)]
use mockall::automock;

/// Generator for the text spoken in a machine turn
///
/// The response is opaque to the conversation driver; implementations decide
/// what to say for a given transcript, including an empty one.
#[cfg_attr(test, automock)]
pub trait ResponseGenerator: Send + Sync {
    /// Produce the reply for the latest transcript
    fn respond(&self, transcript: &str) -> String;
}
