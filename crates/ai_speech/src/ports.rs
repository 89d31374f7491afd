//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription, TranscriptionOptions};

/// Port for microphone capture
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Record audio for the given duration
    ///
    /// # Arguments
    ///
    /// * `duration` - How long to record for
    ///
    /// # Returns
    ///
    /// Returns the captured audio.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::InvalidAudio` for a zero duration and
    /// `SpeechError::RecordingFailed` if the device cannot be read.
    async fn record(&self, duration: Duration) -> Result<AudioData, SpeechError>;

    /// Check if the recorder is available
    async fn is_available(&self) -> bool;
}

/// Port for Speech-to-Text (STT) implementations
///
/// Implementations of this trait convert audio data to text transcriptions.
///
/// # Example
///
/// ```ignore
/// use ai_speech::{SpeechToText, AudioData, TranscriptionOptions};
///
/// async fn transcribe_utterance(
///     stt: &impl SpeechToText,
///     audio: AudioData,
/// ) -> Result<String, SpeechError> {
///     let transcription = stt.transcribe(audio, &TranscriptionOptions::default()).await?;
///     Ok(transcription.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - Audio data to transcribe
    /// * `options` - Model and language hints for this call
    ///
    /// # Returns
    ///
    /// Returns a `Transcription` containing the transcribed text.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails.
    async fn transcribe(
        &self,
        audio: AudioData,
        options: &TranscriptionOptions,
    ) -> Result<Transcription, SpeechError>;

    /// Check if the STT service is available
    async fn is_available(&self) -> bool;

    /// Get the name of the default STT model
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError>;

    /// Check if the TTS service is available
    async fn is_available(&self) -> bool;

    /// Get the name of the current TTS model
    fn model_name(&self) -> &str;
}

/// Port for speaker playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the audio, returning once playback has finished
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::InvalidAudio` for empty audio and
    /// `SpeechError::PlaybackFailed` if the device cannot be written.
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError>;

    /// Check if the player is available
    async fn is_available(&self) -> bool;
}
