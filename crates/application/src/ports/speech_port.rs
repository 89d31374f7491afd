//! Speech ports - Interfaces for the listening and speaking collaborators
//!
//! Each port is a single suspension point for the conversation driver.
//! Capture and transcription are one coalesced call, as are synthesis and
//! playback, so the core never depends on more than one code path for the
//! same operation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Parameters for one capture-and-transcribe call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenRequest {
    /// How long to capture audio for
    pub duration: Duration,
    /// Speech-to-text model name (e.g. "tiny", "base"); provider default if `None`
    pub model: Option<String>,
    /// ISO 639-1 language hint (e.g. "en"); autodetect if `None`
    pub language: Option<String>,
}

impl ListenRequest {
    /// Create a request for the given capture duration
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            model: None,
            language: None,
        }
    }

    /// Set the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the language hint
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Parameters for transcribing an existing recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTranscriptionRequest {
    /// Audio file to transcribe
    pub path: PathBuf,
    /// Speech-to-text model name; provider default if `None`
    pub model: Option<String>,
    /// Language hint; autodetect if `None`
    pub language: Option<String>,
}

impl FileTranscriptionRequest {
    /// Transcribe `path` with the model and language of a capture request
    pub fn from_listen(path: impl Into<PathBuf>, request: ListenRequest) -> Self {
        Self {
            path: path.into(),
            model: request.model,
            language: request.language,
        }
    }
}

/// Port for capturing human speech and turning it into text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ListeningPort: Send + Sync {
    /// Record from the microphone and transcribe the result
    ///
    /// # Errors
    /// `ApplicationError::Recording` when capture fails,
    /// `ApplicationError::Transcription` when speech-to-text fails.
    async fn capture_and_transcribe(
        &self,
        request: ListenRequest,
    ) -> Result<String, ApplicationError>;

    /// Transcribe an audio file instead of capturing from the microphone
    ///
    /// # Errors
    /// `ApplicationError::Transcription` when the file cannot be read or
    /// transcribed. Backends without speech-to-text reject every file.
    async fn transcribe_file(
        &self,
        request: FileTranscriptionRequest,
    ) -> Result<String, ApplicationError> {
        Err(ApplicationError::Transcription(format!(
            "this speech backend cannot transcribe {}",
            request.path.display()
        )))
    }
}

/// Port for turning machine text into audible speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeakingPort: Send + Sync {
    /// Synthesize the text and play it through the speaker
    ///
    /// # Errors
    /// `ApplicationError::Synthesis` when text-to-speech fails,
    /// `ApplicationError::Playback` when the audio cannot be played.
    async fn synthesize_and_play(&self, text: String) -> Result<(), ApplicationError>;

    /// Synthesize the text into an audio file, playing it as well when `play` is set
    ///
    /// # Errors
    /// `ApplicationError::Synthesis` when text-to-speech fails or the file
    /// cannot be written, `ApplicationError::Playback` when playback fails.
    /// Backends that do not produce audio reject every request.
    async fn synthesize_to_file(
        &self,
        _text: String,
        output: PathBuf,
        _play: bool,
    ) -> Result<(), ApplicationError> {
        Err(ApplicationError::Synthesis(format!(
            "this speech backend cannot write audio to {}",
            output.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_request_builder() {
        let request = ListenRequest::new(Duration::from_secs(5))
            .with_model("base")
            .with_language("en");

        assert_eq!(request.duration, Duration::from_secs(5));
        assert_eq!(request.model.as_deref(), Some("base"));
        assert_eq!(request.language.as_deref(), Some("en"));
    }

    #[test]
    fn listen_request_defaults_to_provider_choices() {
        let request = ListenRequest::new(Duration::from_secs(3));
        assert!(request.model.is_none());
        assert!(request.language.is_none());
    }

    #[test]
    fn file_request_keeps_model_and_language() {
        let listen = ListenRequest::new(Duration::from_secs(5))
            .with_model("small")
            .with_language("fr");

        let request = FileTranscriptionRequest::from_listen("clip.wav", listen);

        assert_eq!(request.path, PathBuf::from("clip.wav"));
        assert_eq!(request.model.as_deref(), Some("small"));
        assert_eq!(request.language.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn mock_listening_port_transcribes() {
        let mut mock = MockListeningPort::new();
        mock.expect_capture_and_transcribe()
            .returning(|_| Ok("hello".to_string()));

        let text = mock
            .capture_and_transcribe(ListenRequest::new(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn mock_speaking_port_reports_playback_failure() {
        let mut mock = MockSpeakingPort::new();
        mock.expect_synthesize_and_play()
            .returning(|_| Err(ApplicationError::Playback("device busy".to_string())));

        let err = mock
            .synthesize_and_play("hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Playback(_)));
    }
}
