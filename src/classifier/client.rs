//! Blocking HTTP client for the classification endpoint.
//!
//! Uses the synchronous `ureq` client. One call to [`ClassifierClient::classify`]
//! is exactly one POST; there is no retry or backoff.
use std::time::Duration;

use serde::Deserialize;

use super::protocol::{self, PredictRequest};
use super::{Classify, RequestError};
use crate::config::schema::EndpointConfig;
use crate::model::AnalysisResult;

/// Timeout for the health check; kept short so `health` never stalls.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body from `GET /health`.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for a single classification endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    predict_url: String,
    timeout: Duration,
}

impl ClassifierClient {
    /// Build a client from the resolved endpoint config.
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(&config.url, config.timeout())
    }

    pub fn new(predict_url: &str, timeout: Duration) -> Self {
        Self {
            predict_url: resolve_localhost(predict_url.trim_end_matches('/')),
            timeout,
        }
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    pub fn health_url(&self) -> String {
        protocol::health_url_for(&self.predict_url)
    }

    /// Check whether the endpoint's `/health` route reports `"healthy"`.
    pub fn is_healthy(&self) -> bool {
        let result = ureq::get(&self.health_url())
            .timeout(HEALTH_TIMEOUT.min(self.timeout))
            .call();

        match result {
            Ok(resp) => resp
                .into_json::<HealthResponse>()
                .map(|h| h.status == "healthy")
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl Classify for ClassifierClient {
    fn classify(&self, text: &str) -> Result<AnalysisResult, RequestError> {
        let result = ureq::post(&self.predict_url)
            .timeout(self.timeout)
            .send_json(PredictRequest { text });

        match result {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| RequestError::Transport(e.to_string()))?;

                if !(200..300).contains(&status) {
                    return Err(RequestError::Status {
                        status,
                        detail: protocol::error_detail(&body),
                    });
                }

                protocol::parse_response(&body)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(RequestError::Status {
                    status,
                    detail: protocol::error_detail(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(RequestError::Transport(transport.to_string()))
            }
        }
    }
}

/// On Windows, "localhost" may try IPv6 (::1) first and stall when a local
/// backend only binds IPv4. Use 127.0.0.1 directly.
fn resolve_localhost(url: &str) -> String {
    url.replace("://localhost", "://127.0.0.1")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = EndpointConfig::default();
        let client = ClassifierClient::from_config(&config);
        assert_eq!(
            client.predict_url(),
            "https://customersentimentanalysis-production.up.railway.app/predict"
        );
        assert_eq!(client.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config = EndpointConfig {
            timeout_ms: 0,
            ..EndpointConfig::default()
        };
        let client = ClassifierClient::from_config(&config);
        assert_eq!(client.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn client_strips_trailing_slash_and_localhost() {
        let client = ClassifierClient::new("http://localhost:5000/predict/", Duration::from_secs(1));
        assert_eq!(client.predict_url(), "http://127.0.0.1:5000/predict");
        assert_eq!(client.health_url(), "http://127.0.0.1:5000/health");
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let client = ClassifierClient::new("http://127.0.0.1:9/predict", Duration::from_millis(500));
        let err = client.classify("a review that is long enough").unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
        assert!(!client.is_healthy());
    }
}
