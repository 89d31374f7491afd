//! AI Speech - Local speech capture, transcription, synthesis and playback
//!
//! Provides traits and implementations for the audio side of a conversation:
//! - `AudioRecorder` - Capture audio from the microphone
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//! - `AudioPlayer` - Play audio through the speaker
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - whisper.cpp (STT)
//! - Piper (TTS)
//! - ALSA `arecord` / `aplay` (capture and playback)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{ArecordRecorder, AudioRecorder, SpeechToText, WhisperCppProvider};
//!
//! let recorder = ArecordRecorder::new(config.recorder)?;
//! let stt = WhisperCppProvider::new(config.stt)?;
//!
//! let audio = recorder.record(Duration::from_secs(5)).await?;
//! let transcription = stt.transcribe(audio, &TranscriptionOptions::default()).await?;
//! println!("Transcribed: {}", transcription.text);
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{LocalSttConfig, LocalTtsConfig, PlayerConfig, RecorderConfig, SpeechConfig};
pub use error::SpeechError;
pub use ports::{AudioPlayer, AudioRecorder, SpeechToText, TextToSpeech};
pub use providers::aplay::AplayPlayer;
pub use providers::arecord::ArecordRecorder;
pub use providers::piper::PiperProvider;
pub use providers::whisper_cpp::WhisperCppProvider;
pub use types::{AudioData, AudioFormat, Transcription, TranscriptionOptions};
