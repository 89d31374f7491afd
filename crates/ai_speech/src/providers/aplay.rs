//! ALSA playback provider

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::config::{PlayerConfig, executable_exists};
use crate::error::SpeechError;
use crate::ports::AudioPlayer;
use crate::types::{AudioData, AudioFormat};

/// Speaker output backed by `aplay`
#[derive(Debug, Clone)]
pub struct AplayPlayer {
    config: PlayerConfig,
}

impl AplayPlayer {
    /// Create a new player
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: PlayerConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }
}

#[async_trait]
impl AudioPlayer for AplayPlayer {
    #[instrument(skip(self, audio), fields(bytes = audio.size_bytes(), format = ?audio.format()))]
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio(
                "Cannot play empty audio".to_string(),
            ));
        }
        // aplay only understands raw PCM containers
        if audio.format() != AudioFormat::Wav {
            return Err(SpeechError::InvalidAudio(format!(
                "aplay expects WAV input, got {}",
                audio.format().extension()
            )));
        }

        let file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::PlaybackFailed(format!("Failed to create temp file: {e}"))
        })?;
        tokio::fs::write(file.path(), audio.data())
            .await
            .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to write audio: {e}")))?;

        let mut cmd = Command::new(self.executable());
        if let Some(device) = &self.config.device {
            cmd.arg("-D").arg(device);
        }
        cmd.arg("-q")
            .arg(file.path())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!(command = ?cmd, "Running aplay");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "aplay not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::PlaybackFailed(format!("Failed to run aplay: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr.trim(), "aplay failed");
            return Err(SpeechError::PlaybackFailed(format!(
                "aplay exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }

    async fn is_available(&self) -> bool {
        executable_exists(self.executable())
    }
}
