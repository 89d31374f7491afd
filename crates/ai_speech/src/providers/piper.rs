//! Piper Local Text-to-Speech Provider
//!
//! Implements `TextToSpeech` using the Piper CLI for local speech synthesis.
//!
//! # Prerequisites
//!
//! - Piper must be installed and available in PATH
//! - A voice model (.onnx) with its config (.onnx.json) next to it
//!
//! ```bash
//! mkdir -p models && cd models
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/en/en_US/lessac/medium/en_US-lessac-medium.onnx
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/en/en_US/lessac/medium/en_US-lessac-medium.onnx.json
//! ```

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::{LocalTtsConfig, executable_exists};
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// Local TTS provider using Piper
#[derive(Debug, Clone)]
pub struct PiperProvider {
    config: LocalTtsConfig,
}

impl PiperProvider {
    /// Create a new Piper provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: LocalTtsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Run Piper, feeding the text on stdin
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn run_piper(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to create temp file: {e}"))
        })?;

        let mut cmd = Command::new(self.executable());

        cmd.arg("--model")
            .arg(&self.config.model_path)
            .arg("--output_file")
            .arg(output_file.path())
            .arg("--length_scale")
            .arg(self.config.length_scale.to_string())
            .arg("--sentence_silence")
            .arg(self.config.sentence_silence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(command = ?cmd, "Running piper");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Piper not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run piper: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(|e| {
                SpeechError::SynthesisFailed(format!("Failed to write to piper stdin: {e}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("Failed to wait for piper: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr.trim(), "Piper failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "Piper exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let audio_data = tokio::fs::read(output_file.path()).await.map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to read piper output: {e}"))
        })?;

        if audio_data.is_empty() {
            warn!("Piper produced empty output");
            return Err(SpeechError::SynthesisFailed(
                "Piper produced empty output".to_string(),
            ));
        }

        Ok(audio_data)
    }
}

#[async_trait]
impl TextToSpeech for PiperProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }
        if !self.config.model_path.exists() {
            return Err(SpeechError::ModelNotAvailable(
                self.config.model_path.display().to_string(),
            ));
        }

        let wav = self.run_piper(text).await?;
        Ok(AudioData::new(wav, AudioFormat::Wav))
    }

    async fn is_available(&self) -> bool {
        let executable = executable_exists(self.executable());
        let model = self.config.model_path.exists();

        debug!(executable, model, "Piper availability");

        executable && model
    }

    fn model_name(&self) -> &str {
        self.config.voice_name()
    }
}
