//! Configuration for speech processing

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the local speech stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech-to-text (whisper.cpp)
    #[serde(default)]
    pub stt: LocalSttConfig,

    /// Text-to-speech (Piper)
    #[serde(default)]
    pub tts: LocalTtsConfig,

    /// Microphone capture (arecord)
    #[serde(default)]
    pub recorder: RecorderConfig,

    /// Speaker playback (aplay)
    #[serde(default)]
    pub player: PlayerConfig,
}

impl SpeechConfig {
    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first section error, prefixed with the section name.
    pub fn validate(&self) -> Result<(), String> {
        self.stt.validate().map_err(|e| format!("speech.stt: {e}"))?;
        self.tts.validate().map_err(|e| format!("speech.tts: {e}"))?;
        self.recorder
            .validate()
            .map_err(|e| format!("speech.recorder: {e}"))?;
        self.player
            .validate()
            .map_err(|e| format!("speech.player: {e}"))?;
        Ok(())
    }
}

/// whisper.cpp settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSttConfig {
    /// Path or name of the whisper.cpp CLI
    #[serde(default = "default_whisper_executable")]
    pub executable_path: PathBuf,

    /// Directory holding `ggml-<name>.bin` model files
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Model used when no name is requested or the named one is missing
    #[serde(default = "default_whisper_model")]
    pub model_path: PathBuf,

    /// Number of inference threads
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Language hint used when the caller gives none
    #[serde(default)]
    pub default_language: Option<String>,
}

fn default_whisper_executable() -> PathBuf {
    PathBuf::from("whisper-cli")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_whisper_model() -> PathBuf {
    PathBuf::from("models/ggml-base.bin")
}

const fn default_threads() -> u32 {
    4
}

impl Default for LocalSttConfig {
    fn default() -> Self {
        Self {
            executable_path: default_whisper_executable(),
            models_dir: default_models_dir(),
            model_path: default_whisper_model(),
            threads: default_threads(),
            default_language: None,
        }
    }
}

impl LocalSttConfig {
    /// Resolve a model name to a model file
    ///
    /// `name` maps to `<models_dir>/ggml-<name>.bin` when that file exists;
    /// otherwise the default model path is used.
    #[must_use]
    pub fn resolve_model(&self, name: Option<&str>) -> PathBuf {
        name.map(|m| self.models_dir.join(format!("ggml-{m}.bin")))
            .filter(|path| path.exists())
            .unwrap_or_else(|| self.model_path.clone())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("executable_path must not be empty".to_string());
        }
        if self.model_path.as_os_str().is_empty() {
            return Err("model_path must not be empty".to_string());
        }
        if self.threads == 0 {
            return Err("threads must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Piper settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTtsConfig {
    /// Path or name of the Piper CLI
    #[serde(default = "default_piper_executable")]
    pub executable_path: PathBuf,

    /// Voice model (.onnx); its .onnx.json config must sit next to it
    #[serde(default = "default_piper_model")]
    pub model_path: PathBuf,

    /// Speaking rate; larger is slower
    #[serde(default = "default_length_scale")]
    pub length_scale: f32,

    /// Seconds of silence after each sentence
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence: f32,
}

fn default_piper_executable() -> PathBuf {
    PathBuf::from("piper")
}

fn default_piper_model() -> PathBuf {
    PathBuf::from("models/en_US-lessac-medium.onnx")
}

const fn default_length_scale() -> f32 {
    1.0
}

const fn default_sentence_silence() -> f32 {
    0.2
}

impl Default for LocalTtsConfig {
    fn default() -> Self {
        Self {
            executable_path: default_piper_executable(),
            model_path: default_piper_model(),
            length_scale: default_length_scale(),
            sentence_silence: default_sentence_silence(),
        }
    }
}

impl LocalTtsConfig {
    /// Get the voice name from the model file stem
    #[must_use]
    pub fn voice_name(&self) -> &str {
        self.model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("piper")
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("executable_path must not be empty".to_string());
        }
        if !(0.25..=4.0).contains(&self.length_scale) {
            return Err(format!(
                "length_scale must be between 0.25 and 4.0, got {}",
                self.length_scale
            ));
        }
        if !(0.0..=5.0).contains(&self.sentence_silence) {
            return Err(format!(
                "sentence_silence must be between 0.0 and 5.0, got {}",
                self.sentence_silence
            ));
        }
        Ok(())
    }
}

/// arecord settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Path or name of the arecord binary
    #[serde(default = "default_arecord_executable")]
    pub executable_path: PathBuf,

    /// ALSA capture device; system default if `None`
    #[serde(default)]
    pub device: Option<String>,

    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channel count
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_arecord_executable() -> PathBuf {
    PathBuf::from("arecord")
}

const fn default_sample_rate() -> u32 {
    16_000
}

const fn default_channels() -> u16 {
    1
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            executable_path: default_arecord_executable(),
            device: None,
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

impl RecorderConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("executable_path must not be empty".to_string());
        }
        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Err(format!(
                "sample_rate must be between 8000 and 192000 Hz, got {}",
                self.sample_rate
            ));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(format!("channels must be 1 or 2, got {}", self.channels));
        }
        Ok(())
    }
}

/// aplay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Path or name of the aplay binary
    #[serde(default = "default_aplay_executable")]
    pub executable_path: PathBuf,

    /// ALSA playback device; system default if `None`
    #[serde(default)]
    pub device: Option<String>,
}

fn default_aplay_executable() -> PathBuf {
    PathBuf::from("aplay")
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            executable_path: default_aplay_executable(),
            device: None,
        }
    }
}

impl PlayerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("executable_path must not be empty".to_string());
        }
        Ok(())
    }
}

/// Check whether an executable can be found, either at its path or on `PATH`
pub(crate) fn executable_exists(executable: &Path) -> bool {
    if executable.components().count() > 1 {
        return executable.is_file();
    }
    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| dir.join(executable).is_file())
    })
}
