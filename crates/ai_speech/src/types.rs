//! Types for speech processing
//!
//! Contains data structures for audio data, formats and transcriptions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV format (uncompressed PCM)
    #[default]
    Wav,
    /// MP3 format
    Mp3,
    /// OGG container
    Ogg,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension for this audio format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Guess the format from a file path's extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "ogg" | "oga" => Some(Self::Ogg),
            _ => None,
        }
    }
}

/// Container for audio data with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Raw audio bytes
    data: Vec<u8>,
    /// Audio format
    format: AudioFormat,
    /// Duration in milliseconds (if known)
    duration_ms: Option<u64>,
    /// Sample rate in Hz (if known)
    sample_rate: Option<u32>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            duration_ms: None,
            sample_rate: None,
        }
    }

    /// Create audio data with duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Create audio data with sample rate
    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the duration in milliseconds (if known)
    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Get the sample rate (if known)
    #[must_use]
    pub const fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Generate a filename with appropriate extension
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
    /// Language hint used or detected (ISO 639-1 code)
    pub language: Option<String>,
}

impl Transcription {
    /// Create a simple transcription with just text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    /// Set the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check if transcription is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Per-call transcription parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionOptions {
    /// Model name (e.g. "tiny", "base"); provider default if `None`
    pub model: Option<String>,
    /// ISO 639-1 language hint; provider default if `None`
    pub language: Option<String>,
}

impl TranscriptionOptions {
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

#[cfg(test)]
mod tests {
    use super::*;

    mod audio_format {
        use super::*;

        #[test]
        fn mime_types_are_correct() {
            assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
            assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
            assert_eq!(AudioFormat::Ogg.mime_type(), "audio/ogg");
        }

        #[test]
        fn extensions_are_correct() {
            assert_eq!(AudioFormat::Wav.extension(), "wav");
            assert_eq!(AudioFormat::Mp3.extension(), "mp3");
            assert_eq!(AudioFormat::Ogg.extension(), "ogg");
        }

        #[test]
        fn from_path_is_case_insensitive() {
            assert_eq!(
                AudioFormat::from_path(Path::new("/tmp/reply.WAV")),
                Some(AudioFormat::Wav)
            );
            assert_eq!(
                AudioFormat::from_path(Path::new("clip.mp3")),
                Some(AudioFormat::Mp3)
            );
            assert_eq!(AudioFormat::from_path(Path::new("notes.txt")), None);
            assert_eq!(AudioFormat::from_path(Path::new("no_extension")), None);
        }

        #[test]
        fn serializes_lowercase() {
            let json = serde_json::to_string(&AudioFormat::Ogg).unwrap();
            assert_eq!(json, "\"ogg\"");
        }
    }

    mod audio_data {
        use super::*;

        #[test]
        fn builder_sets_metadata() {
            let audio = AudioData::new(vec![1, 2, 3], AudioFormat::Wav)
                .with_duration(1500)
                .with_sample_rate(16_000);

            assert_eq!(audio.size_bytes(), 3);
            assert_eq!(audio.duration_ms(), Some(1500));
            assert_eq!(audio.sample_rate(), Some(16_000));
            assert!(!audio.is_empty());
        }

        #[test]
        fn filename_uses_extension() {
            let audio = AudioData::new(Vec::new(), AudioFormat::Mp3);
            assert_eq!(audio.filename("reply"), "reply.mp3");
            assert!(audio.is_empty());
        }
    }

    mod transcription {
        use super::*;

        #[test]
        fn whitespace_only_is_empty() {
            assert!(Transcription::new("  \n").is_empty());
            assert!(!Transcription::new("hi").is_empty());
        }

        #[test]
        fn with_language_sets_language() {
            let t = Transcription::new("hallo").with_language("de");
            assert_eq!(t.language.as_deref(), Some("de"));
        }
    }
}
