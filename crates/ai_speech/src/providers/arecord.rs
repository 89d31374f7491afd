//! ALSA capture provider
//!
//! Records signed 16-bit little-endian PCM with `arecord` into a temporary
//! WAV file.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::config::{RecorderConfig, executable_exists};
use crate::error::SpeechError;
use crate::ports::AudioRecorder;
use crate::types::{AudioData, AudioFormat};

/// Microphone recorder backed by `arecord`
#[derive(Debug, Clone)]
pub struct ArecordRecorder {
    config: RecorderConfig,
}

impl ArecordRecorder {
    /// Create a new recorder
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: RecorderConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Build the arecord argument list for a capture of `seconds`
    fn arguments(&self, seconds: u64, output: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(device) = &self.config.device {
            args.push("-D".to_string());
            args.push(device.clone());
        }
        args.extend([
            "-q".to_string(),
            "-f".to_string(),
            "S16_LE".to_string(),
            "-c".to_string(),
            self.config.channels.to_string(),
            "-r".to_string(),
            self.config.sample_rate.to_string(),
            "-t".to_string(),
            "wav".to_string(),
            "-d".to_string(),
            seconds.to_string(),
            output.display().to_string(),
        ]);
        args
    }
}

/// arecord takes whole seconds; round partial seconds up
fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs + 1 } else { secs }
}

#[async_trait]
impl AudioRecorder for ArecordRecorder {
    #[instrument(skip(self))]
    async fn record(&self, duration: Duration) -> Result<AudioData, SpeechError> {
        if duration.is_zero() {
            return Err(SpeechError::InvalidAudio(
                "Recording duration must be greater than zero".to_string(),
            ));
        }

        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::RecordingFailed(format!("Failed to create temp file: {e}"))
        })?;
        let seconds = whole_seconds(duration);

        let mut cmd = Command::new(self.executable());
        cmd.args(self.arguments(seconds, output_file.path()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!(command = ?cmd, "Running arecord");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "arecord not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::RecordingFailed(format!("Failed to run arecord: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr.trim(), "arecord failed");
            return Err(SpeechError::RecordingFailed(format!(
                "arecord exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let data = tokio::fs::read(output_file.path()).await.map_err(|e| {
            SpeechError::RecordingFailed(format!("Failed to read recording: {e}"))
        })?;
        if data.is_empty() {
            return Err(SpeechError::RecordingFailed(
                "arecord produced no audio".to_string(),
            ));
        }

        Ok(AudioData::new(data, AudioFormat::Wav)
            .with_duration(seconds.saturating_mul(1000))
            .with_sample_rate(self.config.sample_rate))
    }

    async fn is_available(&self) -> bool {
        executable_exists(self.executable())
    }
}
