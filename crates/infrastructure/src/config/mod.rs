//! Application configuration
//!
//! Split into focused sub-modules:
//! - `conversation`: cycle count, capture length, waiting pause
//! - `speech`: backend choice and local provider settings
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `parley.toml` in the working directory (optional), or an explicit file (required)
//! 3. environment variables prefixed `PARLEY__`, e.g. `PARLEY__CONVERSATION__CYCLES=4`

mod conversation;
mod speech;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use conversation::ConversationAppConfig;
pub use speech::SpeechAppConfig;

use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Base name of the optional configuration file
pub const DEFAULT_CONFIG_FILE: &str = "parley";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PARLEY";

/// Separator between prefix and nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Conversation settings
    #[serde(default)]
    pub conversation: ConversationAppConfig,

    /// Speech backend and providers
    #[serde(default)]
    pub speech: SpeechAppConfig,

    /// Retry policy for device calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from the optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, taking environment overrides from `env` instead of
    /// the process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("speech.backend", "local")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(backend = %config.speech.backend, "Configuration loaded");
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first section error.
    pub fn validate(&self) -> Result<(), String> {
        self.conversation.validate()?;
        self.speech.validate()?;
        self.retry.validate().map_err(|e| format!("retry: {e}"))?;
        self.telemetry
            .validate()
            .map_err(|e| format!("telemetry: {e}"))?;
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
