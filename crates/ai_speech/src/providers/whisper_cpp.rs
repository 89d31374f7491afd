//! Whisper.cpp Local Speech-to-Text Provider
//!
//! Implements `SpeechToText` using the whisper.cpp CLI for local transcription.
//!
//! # Prerequisites
//!
//! - whisper.cpp must be installed and available in PATH (`whisper-cli`)
//! - One or more GGML model files named `ggml-<name>.bin`
//!
//! ```bash
//! git clone https://github.com/ggerganov/whisper.cpp
//! cd whisper.cpp
//! cmake -B build && cmake --build build -j4
//! ./models/download-ggml-model.sh base
//! ```

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::{LocalSttConfig, executable_exists};
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, AudioFormat, Transcription, TranscriptionOptions};

/// Local STT provider using whisper.cpp
#[derive(Debug, Clone)]
pub struct WhisperCppProvider {
    config: LocalSttConfig,
}

impl WhisperCppProvider {
    /// Create a new whisper.cpp provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: LocalSttConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Run whisper.cpp on a WAV file, returning the plain-text transcript
    #[instrument(skip(self, model, audio_path, work_dir), fields(model = %model.display()))]
    async fn run_whisper(
        &self,
        model: &Path,
        audio_path: &Path,
        work_dir: &Path,
        language: Option<&str>,
    ) -> Result<String, SpeechError> {
        let output_prefix = work_dir.join("transcript");
        let mut cmd = Command::new(self.executable());

        cmd.arg("-m")
            .arg(model)
            .arg("-f")
            .arg(audio_path)
            .arg("-t")
            .arg(self.config.threads.to_string())
            .arg("--no-timestamps")
            .arg("--output-txt")
            .arg("--output-file")
            .arg(&output_prefix);

        if let Some(lang) = language {
            cmd.arg("-l").arg(lang);
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!(command = ?cmd, "Running whisper.cpp");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "whisper.cpp not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::TranscriptionFailed(format!("Failed to run whisper.cpp: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr.trim(), "whisper.cpp failed");
            return Err(SpeechError::TranscriptionFailed(format!(
                "whisper.cpp exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = tokio::fs::read_to_string(output_prefix.with_extension("txt"))
            .await
            .map_err(|e| {
                SpeechError::TranscriptionFailed(format!(
                    "Failed to read transcription output: {e}"
                ))
            })?;

        Ok(collapse_whitespace(&text))
    }
}

/// Join whisper's per-segment lines into one utterance
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl SpeechToText for WhisperCppProvider {
    #[instrument(skip(self, audio), fields(format = ?audio.format(), bytes = audio.size_bytes()))]
    async fn transcribe(
        &self,
        audio: AudioData,
        options: &TranscriptionOptions,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio(
                "Cannot transcribe empty audio".to_string(),
            ));
        }
        if audio.format() != AudioFormat::Wav {
            return Err(SpeechError::InvalidAudio(format!(
                "whisper.cpp expects WAV input, got {}",
                audio.format().extension()
            )));
        }

        let model = self.config.resolve_model(options.model.as_deref());
        if !model.exists() {
            return Err(SpeechError::ModelNotAvailable(model.display().to_string()));
        }

        let work_dir = TempDir::new().map_err(|e| {
            SpeechError::TranscriptionFailed(format!("Failed to create temp dir: {e}"))
        })?;
        let audio_path = work_dir.path().join("input.wav");
        tokio::fs::write(&audio_path, audio.data())
            .await
            .map_err(|e| {
                SpeechError::TranscriptionFailed(format!("Failed to write audio data: {e}"))
            })?;

        let language = options
            .language
            .as_deref()
            .or(self.config.default_language.as_deref());
        let text = self
            .run_whisper(&model, &audio_path, work_dir.path(), language)
            .await?;

        if text.is_empty() {
            warn!("whisper.cpp returned empty transcription");
        }

        let mut transcription = Transcription::new(text);
        if let Some(lang) = language {
            transcription = transcription.with_language(lang);
        }
        Ok(transcription)
    }

    async fn is_available(&self) -> bool {
        let executable = executable_exists(self.executable());
        let model = self.config.model_path.exists();

        debug!(executable, model, "whisper.cpp availability");

        executable && model
    }

    fn model_name(&self) -> &str {
        self.config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("whisper.cpp")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config() -> LocalSttConfig {
        LocalSttConfig {
            executable_path: PathBuf::from("whisper-cli"),
            models_dir: PathBuf::from("/models"),
            model_path: PathBuf::from("/models/ggml-base.bin"),
            threads: 4,
            default_language: Some("en".to_string()),
        }
    }

    fn wav() -> AudioData {
        AudioData::new(vec![0x52, 0x49, 0x46, 0x46], AudioFormat::Wav)
    }

    #[test]
    fn creates_provider_with_valid_config() {
        assert!(WhisperCppProvider::new(test_config()).is_ok());
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = test_config();
        config.threads = 0;
        assert!(matches!(
            WhisperCppProvider::new(config),
            Err(SpeechError::Configuration(_))
        ));
    }

    #[test]
    fn model_name_extracts_from_path() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        assert_eq!(provider.model_name(), "ggml-base");
    }

    #[test]
    fn collapse_whitespace_joins_segments() {
        assert_eq!(
            collapse_whitespace("  Hello there.\n General Kenobi.\n"),
            "Hello there. General Kenobi."
        );
        assert_eq!(collapse_whitespace("\n\n"), "");
    }

    #[tokio::test]
    async fn empty_audio_is_invalid() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        let result = provider
            .transcribe(
                AudioData::new(Vec::new(), AudioFormat::Wav),
                &TranscriptionOptions::default(),
            )
            .await;
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
    }

    #[tokio::test]
    async fn non_wav_audio_is_invalid() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        let result = provider
            .transcribe(
                AudioData::new(vec![1, 2, 3], AudioFormat::Mp3),
                &TranscriptionOptions::default(),
            )
            .await;
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
    }

    #[tokio::test]
    async fn missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.models_dir = dir.path().to_path_buf();
        config.model_path = dir.path().join("ggml-base.bin");
        let provider = WhisperCppProvider::new(config).unwrap();

        let result = provider
            .transcribe(wav(), &TranscriptionOptions::default().with_model("tiny"))
            .await;

        assert!(matches!(result, Err(SpeechError::ModelNotAvailable(_))));
    }

    #[tokio::test]
    async fn missing_executable_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("ggml-base.bin");
        std::fs::write(&model, b"model").unwrap();

        let mut config = test_config();
        config.executable_path = PathBuf::from("/nonexistent/whisper-cli");
        config.model_path = model;
        let provider = WhisperCppProvider::new(config).unwrap();

        let result = provider
            .transcribe(wav(), &TranscriptionOptions::default())
            .await;

        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
        assert!(!provider.is_available().await);
    }
}
