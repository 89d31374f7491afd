//! Speech adapters - Implement the listening and speaking ports on top of
//! the local `ai_speech` providers

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ai_speech::{
    AudioData, AudioFormat, AudioPlayer, AudioRecorder, SpeechError, SpeechToText, TextToSpeech,
    TranscriptionOptions,
};
use application::error::ApplicationError;
use application::ports::{FileTranscriptionRequest, ListenRequest, ListeningPort, SpeakingPort};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::retry::{RetryConfig, retry};

/// Microphone capture followed by whisper transcription
pub struct LocalListeningAdapter {
    recorder: Arc<dyn AudioRecorder>,
    stt: Arc<dyn SpeechToText>,
    retry: RetryConfig,
}

impl fmt::Debug for LocalListeningAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalListeningAdapter")
            .field("stt_model", &self.stt.model_name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl LocalListeningAdapter {
    /// Create a new listening adapter
    pub fn new(
        recorder: Arc<dyn AudioRecorder>,
        stt: Arc<dyn SpeechToText>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            recorder,
            stt,
            retry,
        }
    }

    async fn transcribe(
        &self,
        audio: AudioData,
        model: Option<String>,
        language: Option<String>,
    ) -> Result<String, ApplicationError> {
        let options = TranscriptionOptions { model, language };
        let transcription = self
            .stt
            .transcribe(audio, &options)
            .await
            .map_err(transcription_error)?;
        Ok(transcription.text)
    }
}

/// Every recorder failure is a recording failure to the conversation
fn recording_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Recording(err.to_string())
}

fn transcription_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Transcription(err.to_string())
}

fn synthesis_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Synthesis(err.to_string())
}

fn playback_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Playback(err.to_string())
}

#[async_trait]
impl ListeningPort for LocalListeningAdapter {
    #[instrument(skip(self), fields(duration = ?request.duration))]
    async fn capture_and_transcribe(
        &self,
        request: ListenRequest,
    ) -> Result<String, ApplicationError> {
        let duration = request.duration;
        let audio = retry(&self.retry, || self.recorder.record(duration))
            .await
            .map_err(recording_error)?;
        debug!(bytes = audio.size_bytes(), "Captured audio");

        self.transcribe(audio, request.model, request.language)
            .await
    }

    #[instrument(skip(self), fields(path = %request.path.display()))]
    async fn transcribe_file(
        &self,
        request: FileTranscriptionRequest,
    ) -> Result<String, ApplicationError> {
        let format = AudioFormat::from_path(&request.path).ok_or_else(|| {
            ApplicationError::Transcription(format!(
                "unrecognised audio file extension: {}",
                request.path.display()
            ))
        })?;
        let bytes = tokio::fs::read(&request.path).await.map_err(|e| {
            ApplicationError::Transcription(format!(
                "failed to read {}: {e}",
                request.path.display()
            ))
        })?;
        let audio = AudioData::new(bytes, format);
        debug!(bytes = audio.size_bytes(), format = ?format, "Loaded audio file");

        self.transcribe(audio, request.model, request.language)
            .await
    }
}

/// Piper synthesis followed by speaker playback
pub struct LocalSpeakingAdapter {
    tts: Arc<dyn TextToSpeech>,
    player: Arc<dyn AudioPlayer>,
    retry: RetryConfig,
}

impl fmt::Debug for LocalSpeakingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSpeakingAdapter")
            .field("tts_model", &self.tts.model_name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl LocalSpeakingAdapter {
    /// Create a new speaking adapter
    pub fn new(
        tts: Arc<dyn TextToSpeech>,
        player: Arc<dyn AudioPlayer>,
        retry: RetryConfig,
    ) -> Self {
        Self { tts, player, retry }
    }
}

#[async_trait]
impl SpeakingPort for LocalSpeakingAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize_and_play(&self, text: String) -> Result<(), ApplicationError> {
        let audio = self.tts.synthesize(&text).await.map_err(synthesis_error)?;
        debug!(bytes = audio.size_bytes(), "Synthesized audio");

        retry(&self.retry, || self.player.play(&audio))
            .await
            .map_err(playback_error)
    }

    #[instrument(skip(self, text), fields(text_len = text.len(), output = %output.display()))]
    async fn synthesize_to_file(
        &self,
        text: String,
        output: PathBuf,
        play: bool,
    ) -> Result<(), ApplicationError> {
        let audio = self.tts.synthesize(&text).await.map_err(synthesis_error)?;
        tokio::fs::write(&output, audio.data()).await.map_err(|e| {
            ApplicationError::Synthesis(format!(
                "failed to save audio to {}: {e}",
                output.display()
            ))
        })?;
        info!(bytes = audio.size_bytes(), "Saved synthesized audio");

        if play {
            retry(&self.retry, || self.player.play(&audio))
                .await
                .map_err(playback_error)?;
        }
        Ok(())
    }
}
