//! Wire format of the classification endpoint.
//!
//! ```text
//! POST /predict  {"text": "..."}
//! 200            {"success": true, "text": "...",
//!                 "result": {"sentiment": "Positive", "confidence": 92.0, "label": 2}}
//! 4xx/5xx        {"error": "..."}
//! ```
use serde::{Deserialize, Serialize};

use super::RequestError;
use crate::model::{AnalysisResult, Sentiment, percent_to_fraction};

/// Request body for `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

/// Response body from `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<PredictPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The classification inside a successful response.
#[derive(Debug, Deserialize)]
pub struct PredictPayload {
    pub sentiment: Sentiment,
    /// Confidence on a 0–100 scale.
    pub confidence: f64,
    /// Numeric class: 0 = Negative, 1 = Neutral, 2 = Positive.
    #[serde(default)]
    pub label: Option<u8>,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl PredictResponse {
    /// Interpret the response as an [`AnalysisResult`].
    pub fn into_result(self) -> Result<AnalysisResult, RequestError> {
        if !self.success {
            return Err(RequestError::Unsuccessful { detail: self.error });
        }

        let payload = self
            .result
            .ok_or_else(|| RequestError::Malformed("missing `result` object".to_string()))?;

        if !payload.confidence.is_finite() || !(0.0..=100.0).contains(&payload.confidence) {
            return Err(RequestError::Malformed(format!(
                "confidence {} outside 0-100",
                payload.confidence
            )));
        }

        Ok(AnalysisResult {
            sentiment: payload.sentiment,
            confidence: percent_to_fraction(payload.confidence),
        })
    }
}

/// Parse a raw success body.
pub fn parse_response(body: &str) -> Result<AnalysisResult, RequestError> {
    let parsed: PredictResponse =
        serde_json::from_str(body).map_err(|e| RequestError::Malformed(e.to_string()))?;
    parsed.into_result()
}

/// Pull the `error` message out of a failure body, if it has one.
pub fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}

/// Derive the health-check URL from the predict URL.
///
/// `https://host/predict` → `https://host/health`. A URL without a path
/// gets `/health` appended.
pub fn health_url_for(predict_url: &str) -> String {
    let trimmed = predict_url.trim_end_matches('/');
    let after_scheme = trimmed.find("://").map(|i| i + 3).unwrap_or(0);

    match trimmed[after_scheme..].rfind('/') {
        Some(idx) => format!("{}/health", &trimmed[..after_scheme + idx]),
        None => format!("{trimmed}/health"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
