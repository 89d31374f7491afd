//! Conversation settings: cycle count, capture length, waiting pause.

use std::time::Duration;

use application::{ConversationRequest, ConversationSettings};
use domain::ConversationState;
use serde::{Deserialize, Serialize};

/// `[conversation]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAppConfig {
    /// Requested cycle count; normalised to an even number of at least 2
    #[serde(default)]
    pub cycles: Option<i64>,

    /// Capture length per human turn in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Speech-to-text model name
    #[serde(default)]
    pub model: Option<String>,

    /// Language hint for transcription
    #[serde(default)]
    pub language: Option<String>,

    /// State the conversation starts in (`listening` or `speaking`)
    #[serde(default = "default_initial_state")]
    pub initial_state: ConversationState,

    /// Pause between a machine turn and the next capture
    #[serde(default)]
    pub waiting_enabled: bool,

    /// Length of the pause in milliseconds
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
}

const fn default_duration_secs() -> u64 {
    5
}

const fn default_initial_state() -> ConversationState {
    ConversationState::Listening
}

const fn default_wait_ms() -> u64 {
    100
}

impl Default for ConversationAppConfig {
    fn default() -> Self {
        Self {
            cycles: None,
            duration_secs: default_duration_secs(),
            model: None,
            language: None,
            initial_state: default_initial_state(),
            waiting_enabled: false,
            wait_ms: default_wait_ms(),
        }
    }
}

impl ConversationAppConfig {
    /// Settings for the conversation service
    #[must_use]
    pub fn settings(&self) -> ConversationSettings {
        ConversationSettings {
            listen_duration: Duration::from_secs(self.duration_secs),
            model: self.model.clone(),
            language: self.language.clone(),
            waiting_enabled: self.waiting_enabled,
            wait_duration: Duration::from_millis(self.wait_ms),
        }
    }

    /// Run parameters for one conversation
    #[must_use]
    pub const fn request(&self) -> ConversationRequest {
        ConversationRequest {
            cycles: self.cycles,
            initial_state: Some(self.initial_state),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_secs == 0 {
            return Err("conversation.duration_secs must be greater than 0".to_string());
        }
        if self.initial_state.is_terminal() {
            return Err("conversation.initial_state cannot be 'stopped'".to_string());
        }
        if self.initial_state == ConversationState::Waiting {
            return Err(
                "conversation.initial_state must be 'listening' or 'speaking'".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let config = ConversationAppConfig::default();
        assert_eq!(config.settings(), ConversationSettings::default());
        assert_eq!(config.request().cycles, None);
        assert_eq!(
            config.request().initial_state,
            Some(ConversationState::Listening)
        );
    }

    #[test]
    fn settings_carry_overrides() {
        let config = ConversationAppConfig {
            duration_secs: 3,
            model: Some("tiny".to_string()),
            waiting_enabled: true,
            wait_ms: 250,
            ..ConversationAppConfig::default()
        };
        let settings = config.settings();

        assert_eq!(settings.listen_duration, Duration::from_secs(3));
        assert_eq!(settings.model.as_deref(), Some("tiny"));
        assert!(settings.waiting_enabled);
        assert_eq!(settings.wait_duration, Duration::from_millis(250));
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let config = ConversationAppConfig {
            duration_secs: 0,
            ..ConversationAppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_starting_states() {
        for state in [ConversationState::Stopped, ConversationState::Waiting] {
            let config = ConversationAppConfig {
                initial_state: state,
                ..ConversationAppConfig::default()
            };
            assert!(config.validate().is_err(), "{state} accepted");
        }
    }
}
