//! Core data types shared by the analyzer, history, and dashboard.
//!
//! - [`Sentiment`]: the label assigned by the classification endpoint
//! - [`AnalysisResult`]: label + confidence fraction for one review
//! - [`AnalysisHistoryItem`]: a completed analysis as recorded in history

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Sentiment label returned by the classifier.
///
/// Recognition is an exact, case-sensitive match on `"Positive"`,
/// `"Negative"` and `"Neutral"`. Any other label is kept verbatim in
/// [`Sentiment::Unrecognized`] so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unrecognized(String),
}

impl Sentiment {
    /// The display label (the raw label for unrecognized values).
    pub fn label(&self) -> &str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Positive" => Self::Positive,
            "Negative" => Self::Negative,
            "Neutral" => Self::Neutral,
            _ => Self::Unrecognized(label),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Unrecognized(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one successful classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    /// Model certainty as a fraction in `[0, 1]`.
    pub confidence: f64,
}

/// A completed analysis as stored in history.
///
/// Built exactly once per successful analysis. Fields are private so a
/// recorded item cannot be edited after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistoryItem {
    id: String,
    text: String,
    analyzed_at: String,
    #[serde(flatten)]
    result: AnalysisResult,
}

impl AnalysisHistoryItem {
    /// Record `result` for the review `text` under a freshly generated id.
    pub fn new(result: AnalysisResult, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            analyzed_at: Utc::now().to_rfc3339(),
            result,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn analyzed_at(&self) -> &str {
        &self.analyzed_at
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn sentiment(&self) -> &Sentiment {
        &self.result.sentiment
    }

    pub fn confidence(&self) -> f64 {
        self.result.confidence
    }
}

/// Convert a 0–100 wire confidence into the internal `[0, 1]` fraction.
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
