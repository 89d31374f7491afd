//! Speech settings: backend choice plus the local provider configuration.

use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};

/// `[speech]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAppConfig {
    /// Capability name resolved by the registry (`local` or `console`)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Provider settings used by the `local` backend
    #[serde(flatten)]
    pub local: SpeechConfig,
}

fn default_backend() -> String {
    "local".to_string()
}

impl Default for SpeechAppConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            local: SpeechConfig::default(),
        }
    }
}

impl SpeechAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.trim().is_empty() {
            return Err("speech.backend must not be empty".to_string());
        }
        self.local.validate()
    }
}
