//! Configuration schema and defaults.
//!
//! Sections: `[endpoint]`, `[web]`, `[logging]`. Every field has a built-in
//! default; users only set the values they want to override.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Classification endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://customersentimentanalysis-production.up.railway.app/predict";

/// Default listen address for the dashboard server.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9746";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps directly to `~/.sentiment-insights/config.toml` and
/// `.sentiment-insights.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [endpoint]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Full URL of the `POST` classification route.
    pub url: String,
    /// Request timeout in milliseconds. Zero falls back to the default.
    pub timeout_ms: u64,
}

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EndpointConfig {
    /// The effective request timeout. A zero value would fail every request
    /// immediately, so it resolves to the default instead.
    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// `host:port` the dashboard listens on.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write one JSONL event per analysis attempt.
    pub enabled: bool,
    /// Event log location. Defaults to `~/.sentiment-insights/events.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl AppConfig {
    /// Annotated default config written by `config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# sentiment-insights configuration
#
# Precedence (highest last): built-in defaults, this file,
# ./.sentiment-insights.toml, SENTIMENT_* environment variables.

[endpoint]
# Classification route. Receives POST {{"text": "..."}}.
url = "{DEFAULT_ENDPOINT_URL}"
# Request timeout in milliseconds.
timeout_ms = 30000

[web]
# Address the dashboard listens on.
addr = "{DEFAULT_WEB_ADDR}"
open_browser = true

[logging]
# One JSONL line per analysis attempt (review text is never logged).
enabled = true
# path = "/custom/location/events.jsonl"
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.endpoint.timeout_ms, 30_000);
        assert_eq!(config.web.addr, "127.0.0.1:9746");
        assert!(config.web.open_browser);
        assert!(config.logging.enabled);
        assert!(config.logging.path.is_none());
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
[endpoint]
url = "http://localhost:5000/predict"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:5000/predict");
        assert_eq!(config.endpoint.timeout_ms, 30_000);
        assert!(config.web.open_browser);
    }

    #[test]
    fn deserialize_full_toml() {
        let toml_str = r#"
[endpoint]
url = "http://10.0.0.5:5000/predict"
timeout_ms = 2500

[web]
addr = "0.0.0.0:8080"
open_browser = false

[logging]
enabled = false
path = "/var/log/si.jsonl"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.timeout_ms, 2500);
        assert_eq!(config.web.addr, "0.0.0.0:8080");
        assert!(!config.web.open_browser);
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.path.as_deref(), Some("/var/log/si.jsonl"));
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
