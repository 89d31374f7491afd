//! Speech service - Single-shot capture and playback
//!
//! Used by the `audio-in` and `audio-out` commands. Unlike the conversation
//! handlers, these operations report collaborator failures to the caller.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::{FileTranscriptionRequest, ListenRequest, ListeningPort, SpeakingPort};

/// Service for one-off listening and speaking
pub struct SpeechService {
    listener: Arc<dyn ListeningPort>,
    speaker: Arc<dyn SpeakingPort>,
}

impl fmt::Debug for SpeechService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechService").finish_non_exhaustive()
    }
}

impl SpeechService {
    /// Create a new speech service
    pub fn new(listener: Arc<dyn ListeningPort>, speaker: Arc<dyn SpeakingPort>) -> Self {
        Self { listener, speaker }
    }

    /// Capture and transcribe a single utterance
    #[instrument(skip(self))]
    pub async fn listen_once(&self, request: ListenRequest) -> Result<String, ApplicationError> {
        let text = self.listener.capture_and_transcribe(request).await?;
        info!(chars = text.chars().count(), "Captured utterance");
        Ok(text)
    }

    /// Transcribe an existing audio file
    ///
    /// A path that is not a regular file is rejected before the listener is called.
    #[instrument(skip(self), fields(path = %request.path.display()))]
    pub async fn transcribe_file(
        &self,
        request: FileTranscriptionRequest,
    ) -> Result<String, ApplicationError> {
        match tokio::fs::metadata(&request.path).await {
            Ok(metadata) if metadata.is_file() => {},
            _ => {
                return Err(ApplicationError::Transcription(format!(
                    "file not found: {}",
                    request.path.display()
                )));
            },
        }

        let text = self.listener.transcribe_file(request).await?;
        info!(chars = text.chars().count(), "Transcribed file");
        Ok(text)
    }

    /// Synthesize and play a single utterance
    ///
    /// Blank text is rejected before any collaborator is called.
    #[instrument(skip(self, text))]
    pub async fn speak_once(&self, text: &str) -> Result<(), ApplicationError> {
        let text = non_blank(text)?;
        self.speaker.synthesize_and_play(text.to_string()).await?;
        info!(chars = text.chars().count(), "Played utterance");
        Ok(())
    }

    /// Synthesize a single utterance into `output`, optionally playing it too
    #[instrument(skip(self, text), fields(output = %output.display()))]
    pub async fn synthesize_to(
        &self,
        text: &str,
        output: &Path,
        play: bool,
    ) -> Result<(), ApplicationError> {
        let text = non_blank(text)?;
        self.speaker
            .synthesize_to_file(text.to_string(), output.to_path_buf(), play)
            .await?;
        info!(chars = text.chars().count(), play, "Saved utterance");
        Ok(())
    }
}

fn non_blank(text: &str) -> Result<&str, ApplicationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApplicationError::Synthesis(
            "nothing to say: text is empty".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use mockall::predicate::eq;

    use super::*;
    use crate::ports::{MockListeningPort, MockSpeakingPort};

    #[tokio::test]
    async fn listen_once_returns_transcript() {
        let mut listener = MockListeningPort::new();
        listener
            .expect_capture_and_transcribe()
            .with(eq(ListenRequest::new(Duration::from_secs(3)).with_model("base")))
            .times(1)
            .returning(|_| Ok("good morning".to_string()));

        let service = SpeechService::new(Arc::new(listener), Arc::new(MockSpeakingPort::new()));
        let text = service
            .listen_once(ListenRequest::new(Duration::from_secs(3)).with_model("base"))
            .await
            .unwrap();

        assert_eq!(text, "good morning");
    }

    #[tokio::test]
    async fn listen_once_surfaces_failures() {
        let mut listener = MockListeningPort::new();
        listener
            .expect_capture_and_transcribe()
            .returning(|_| Err(ApplicationError::Recording("device busy".to_string())));

        let service = SpeechService::new(Arc::new(listener), Arc::new(MockSpeakingPort::new()));
        let result = service
            .listen_once(ListenRequest::new(Duration::from_secs(1)))
            .await;

        assert!(matches!(result, Err(ApplicationError::Recording(_))));
    }

    #[tokio::test]
    async fn speak_once_trims_text() {
        let mut speaker = MockSpeakingPort::new();
        speaker
            .expect_synthesize_and_play()
            .with(eq("hello there".to_string()))
            .times(1)
            .returning(|_| Ok(()));

        let service = SpeechService::new(Arc::new(MockListeningPort::new()), Arc::new(speaker));
        service.speak_once("  hello there \n").await.unwrap();
    }

    #[tokio::test]
    async fn speak_once_rejects_blank_text() {
        let service = SpeechService::new(
            Arc::new(MockListeningPort::new()),
            Arc::new(MockSpeakingPort::new()),
        );

        let result = service.speak_once("   ").await;
        assert!(matches!(result, Err(ApplicationError::Synthesis(_))));
    }

    #[tokio::test]
    async fn speak_once_surfaces_failures() {
        let mut speaker = MockSpeakingPort::new();
        speaker
            .expect_synthesize_and_play()
            .returning(|_| Err(ApplicationError::Playback("no sink".to_string())));

        let service = SpeechService::new(Arc::new(MockListeningPort::new()), Arc::new(speaker));
        let result = service.speak_once("hi").await;

        assert!(matches!(result, Err(ApplicationError::Playback(_))));
    }

    #[tokio::test]
    async fn transcribe_file_delegates_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let expected = FileTranscriptionRequest {
            path: path.clone(),
            model: Some("tiny".to_string()),
            language: None,
        };
        let mut listener = MockListeningPort::new();
        listener.expect_capture_and_transcribe().never();
        listener
            .expect_transcribe_file()
            .with(eq(expected.clone()))
            .times(1)
            .returning(|_| Ok("from the archive".to_string()));

        let service = SpeechService::new(Arc::new(listener), Arc::new(MockSpeakingPort::new()));
        let text = service.transcribe_file(expected).await.unwrap();

        assert_eq!(text, "from the archive");
    }

    #[tokio::test]
    async fn transcribe_file_rejects_missing_file() {
        let mut listener = MockListeningPort::new();
        listener.expect_transcribe_file().never();

        let service = SpeechService::new(Arc::new(listener), Arc::new(MockSpeakingPort::new()));
        let result = service
            .transcribe_file(FileTranscriptionRequest::from_listen(
                "/definitely/not/here.wav",
                ListenRequest::new(Duration::from_secs(1)),
            ))
            .await;

        match result {
            Err(ApplicationError::Transcription(msg)) => assert!(msg.contains("file not found")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn synthesize_to_passes_trimmed_text_and_play_flag() {
        let mut speaker = MockSpeakingPort::new();
        speaker.expect_synthesize_and_play().never();
        speaker
            .expect_synthesize_to_file()
            .with(
                eq("save me".to_string()),
                eq(PathBuf::from("out.wav")),
                eq(false),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = SpeechService::new(Arc::new(MockListeningPort::new()), Arc::new(speaker));
        service
            .synthesize_to(" save me ", Path::new("out.wav"), false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn synthesize_to_rejects_blank_text() {
        let mut speaker = MockSpeakingPort::new();
        speaker.expect_synthesize_to_file().never();

        let service = SpeechService::new(Arc::new(MockListeningPort::new()), Arc::new(speaker));
        let result = service.synthesize_to("\n", Path::new("out.wav"), true).await;

        assert!(matches!(result, Err(ApplicationError::Synthesis(_))));
    }
}
