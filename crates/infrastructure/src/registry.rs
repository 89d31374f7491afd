//! Speech backend registry
//!
//! Backends are a closed set named in configuration and resolved once at
//! start-up. Each backend produces the listening and speaking ports; the
//! pacer and responder are shared.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ai_speech::{AplayPlayer, ArecordRecorder, PiperProvider, SpeechError, WhisperCppProvider};
use application::error::ApplicationError;
use application::ports::{ConversationPorts, ListeningPort, SpeakingPort};
use application::services::{EchoResponder, SpeechService};
use tracing::info;

use crate::adapters::{
    ConsoleListeningAdapter, ConsoleSpeakingAdapter, LocalListeningAdapter, LocalSpeakingAdapter,
    TokioPacer,
};
use crate::config::AppConfig;

/// Available speech backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    /// arecord + whisper.cpp, Piper + aplay
    Local,
    /// stdin / stdout text mode
    Console,
}

impl SpeechBackend {
    /// Every registered backend
    pub const ALL: [Self; 2] = [Self::Local, Self::Console];

    /// Capability name used in configuration
    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for SpeechBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeechBackend {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "console" | "text" => Ok(Self::Console),
            other => Err(ApplicationError::Configuration(format!(
                "unknown speech backend '{other}'; expected one of: local, console"
            ))),
        }
    }
}

fn provider_error(err: SpeechError) -> ApplicationError {
    ApplicationError::Configuration(err.to_string())
}

type SpeechPorts = (Arc<dyn ListeningPort>, Arc<dyn SpeakingPort>);

fn build_speech_ports(config: &AppConfig) -> Result<SpeechPorts, ApplicationError> {
    let backend: SpeechBackend = config.speech.backend.parse()?;
    info!(backend = %backend, "Resolved speech backend");

    match backend {
        SpeechBackend::Local => {
            let speech = &config.speech.local;
            let recorder = ArecordRecorder::new(speech.recorder.clone()).map_err(provider_error)?;
            let stt = WhisperCppProvider::new(speech.stt.clone()).map_err(provider_error)?;
            let tts = PiperProvider::new(speech.tts.clone()).map_err(provider_error)?;
            let player = AplayPlayer::new(speech.player.clone()).map_err(provider_error)?;

            Ok((
                Arc::new(LocalListeningAdapter::new(
                    Arc::new(recorder),
                    Arc::new(stt),
                    config.retry.clone(),
                )),
                Arc::new(LocalSpeakingAdapter::new(
                    Arc::new(tts),
                    Arc::new(player),
                    config.retry.clone(),
                )),
            ))
        },
        SpeechBackend::Console => Ok((
            Arc::new(ConsoleListeningAdapter::stdin()),
            Arc::new(ConsoleSpeakingAdapter::stdout()),
        )),
    }
}

/// Compose the collaborators for a conversation from configuration
///
/// # Errors
///
/// `ApplicationError::Configuration` for an unknown backend or invalid
/// provider settings.
pub fn build_conversation_ports(config: &AppConfig) -> Result<ConversationPorts, ApplicationError> {
    let (listener, speaker) = build_speech_ports(config)?;
    Ok(ConversationPorts::new(
        listener,
        speaker,
        Arc::new(TokioPacer::new()),
        Arc::new(EchoResponder::new()),
    ))
}

/// Compose the single-shot speech service from configuration
///
/// # Errors
///
/// Same as [`build_conversation_ports`].
pub fn build_speech_service(config: &AppConfig) -> Result<SpeechService, ApplicationError> {
    let (listener, speaker) = build_speech_ports(config)?;
    Ok(SpeechService::new(listener, speaker))
}
