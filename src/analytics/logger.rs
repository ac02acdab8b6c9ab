use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analyzer::ValidationError;
use crate::classifier::RequestError;
use crate::config::schema::LoggingConfig;
use crate::model::AnalysisResult;

// ---------------------------------------------------------------------------
// Event entry (JSONL)
// ---------------------------------------------------------------------------

/// One line of the event log (`~/.sentiment-insights/events.jsonl`).
///
/// Written for every submit attempt. The review text itself is never
/// logged, only its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEvent {
    pub timestamp: String,
    /// `"success"`, `"validation_error"` or `"request_error"`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sentiment: Option<String>,
    /// Confidence fraction in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    pub text_chars: usize,
    /// Round-trip time of the classification call.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AnalysisEvent {
    fn base(outcome: &str, text_chars: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            outcome: outcome.to_string(),
            sentiment: None,
            confidence: None,
            text_chars,
            latency_ms: None,
            error: None,
        }
    }

    pub fn success(result: &AnalysisResult, text_chars: usize, latency_ms: u64) -> Self {
        Self {
            sentiment: Some(result.sentiment.label().to_string()),
            confidence: Some(result.confidence),
            latency_ms: Some(latency_ms),
            ..Self::base("success", text_chars)
        }
    }

    pub fn validation_failure(text_chars: usize, err: &ValidationError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::base("validation_error", text_chars)
        }
    }

    pub fn request_failure(text_chars: usize, latency_ms: u64, err: &RequestError) -> Self {
        let error = match err.detail() {
            Some(detail) => format!("{err}: {detail}"),
            None => err.to_string(),
        };
        Self {
            latency_ms: Some(latency_ms),
            error: Some(error),
            ..Self::base("request_error", text_chars)
        }
    }
}

// ---------------------------------------------------------------------------
// Log file
// ---------------------------------------------------------------------------

/// Append-only JSONL event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build the log described by `config`, or `None` when logging is
    /// disabled or no home directory is available.
    pub fn from_config(config: &LoggingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        match &config.path {
            Some(path) if !path.trim().is_empty() => Some(Self::new(path)),
            _ => default_log_path().map(Self::new),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `event`. Best-effort; failures are silently ignored.
    pub fn record(&self, event: &AnalysisEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &AnalysisEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every event in the log.
    ///
    /// Silently skips malformed lines. Returns an empty vec if the file does
    /// not exist or cannot be read.
    pub fn read_all(&self) -> Vec<AnalysisEvent> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<AnalysisEvent>(&line).ok())
            .collect()
    }
}

/// Default event log location: `~/.sentiment-insights/events.jsonl`.
pub fn default_log_path() -> Option<PathBuf> {
    crate::config::data_dir().map(|dir| dir.join("events.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sentiment;

    #[test]
    fn disabled_config_yields_no_log() {
        let config = LoggingConfig {
            enabled: false,
            path: Some("/tmp/whatever.jsonl".to_string()),
        };
        assert!(EventLog::from_config(&config).is_none());
    }

    #[test]
    fn explicit_path_is_used() {
        let config = LoggingConfig {
            enabled: true,
            path: Some("/tmp/si-events.jsonl".to_string()),
        };
        let log = EventLog::from_config(&config).unwrap();
        assert_eq!(log.path(), Path::new("/tmp/si-events.jsonl"));
    }

    #[test]
    fn record_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("nested").join("events.jsonl"));

        let result = AnalysisResult {
            sentiment: Sentiment::Negative,
            confidence: 0.81,
        };
        log.record(&AnalysisEvent::success(&result, 42, 120));
        log.record(&AnalysisEvent::request_failure(
            42,
            30,
            &RequestError::Status {
                status: 400,
                detail: Some("No text provided".to_string()),
            },
        ));

        let events = log.read_all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sentiment.as_deref(), Some("Negative"));
        assert_eq!(events[0].latency_ms, Some(120));
        assert_eq!(events[1].outcome, "request_error");
        assert_eq!(
            events[1].error.as_deref(),
            Some("endpoint returned HTTP 400: No text provided")
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        fs::write(
            &path,
            "not json\n{\"timestamp\":\"t\",\"outcome\":\"success\",\"text_chars\":30}\n",
        )
        .unwrap();

        let events = EventLog::new(path).read_all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text_chars, 30);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EventLog::new(dir.path().join("absent.jsonl")).read_all().is_empty());
    }

    #[test]
    fn success_event_omits_error_field() {
        let result = AnalysisResult {
            sentiment: Sentiment::Positive,
            confidence: 0.5,
        };
        let json = serde_json::to_string(&AnalysisEvent::success(&result, 25, 10)).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"outcome\":\"success\""));
    }
}
