//! Tracing initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a single
//! fmt layer (human-readable or JSON) writing to stderr, so stdout stays free
//! for command output.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive (e.g. "warn", "application=debug,info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the filter directive does not parse.
    pub fn validate(&self) -> Result<(), String> {
        EnvFilter::try_new(&self.log_filter)
            .map(|_| ())
            .map_err(|e| format!("invalid log_filter '{}': {e}", self.log_filter))
    }
}

/// Error type for tracing initialisation
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive did not parse
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Pick the filter directive: an explicit override wins, then `RUST_LOG`,
/// then the configured filter
fn resolve_filter(
    config: &TelemetryConfig,
    override_filter: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(directive) = override_filter {
        return EnvFilter::try_new(directive).map_err(|e| TelemetryError::Filter(e.to_string()));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_filter).map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns `TelemetryError::Filter` for a bad directive and
/// `TelemetryError::Init` if a subscriber is already installed.
pub fn init_tracing(
    config: &TelemetryConfig,
    override_filter: Option<&str>,
) -> Result<(), TelemetryError> {
    let filter = resolve_filter(config, override_filter)?;

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_warn() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "warn");
        assert!(!config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn override_takes_precedence() {
        let config = TelemetryConfig {
            log_filter: "error".to_string(),
            json: false,
        };
        let filter = resolve_filter(&config, Some("debug")).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let config = TelemetryConfig::default();
        let result = resolve_filter(&config, Some("application=notalevel"));
        assert!(matches!(result, Err(TelemetryError::Filter(_))));
    }

    #[test]
    fn validate_rejects_bad_directive() {
        let config = TelemetryConfig {
            log_filter: "application=loud".to_string(),
            json: true,
        };
        assert!(config.validate().is_err());
    }
}
