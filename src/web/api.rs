//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns an [`ApiReply`]:
//! a status code and a JSON body. The server turns it into a
//! `tiny_http` response.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzer::samples::SAMPLE_REVIEWS;
use crate::analyzer::{AnalysisError, AnalyzerSnapshot, Notice, ResultView};
use crate::app::App;
use crate::classifier::ClassifierClient;
use crate::config::{self, AppConfig};
use crate::dashboard::DashboardView;
use crate::history::HISTORY_CAP;
use crate::model::AnalysisHistoryItem;

/// A handler's answer before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Deserialize)]
struct SampleRequest {
    index: usize,
}

/// Everything the page needs on load.
#[derive(Serialize)]
struct StateResponse<'a> {
    analyzer: AnalyzerSnapshot,
    dashboard: DashboardView,
    samples: &'a [&'static str],
}

#[derive(Serialize)]
struct AnalyzeResponse {
    result: Option<ResultView>,
    item: AnalysisHistoryItem,
    dashboard: DashboardView,
}

/// Body of a failed analyze: the notice to toast plus the analyzer state.
#[derive(Serialize)]
struct NoticeResponse {
    notice: Notice,
    analyzer: AnalyzerSnapshot,
}

#[derive(Serialize)]
struct AnalyzerResponse {
    analyzer: AnalyzerSnapshot,
}

#[derive(Serialize)]
struct HistoryResponse<'a> {
    cap: usize,
    items: &'a [AnalysisHistoryItem],
}

#[derive(Serialize)]
struct ConfigResponse<'a> {
    config: &'a AppConfig,
    toml_text: String,
}

#[derive(Serialize)]
struct HealthResponse {
    endpoint_url: String,
    endpoint_healthy: bool,
    config_exists: bool,
    logging_enabled: bool,
    log_path: Option<String>,
    history_len: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_reply<T: Serialize>(status: u16, data: &T) -> Result<ApiReply> {
    let body = serde_json::to_value(data).context("failed to serialize JSON response")?;
    Ok(ApiReply { status, body })
}

fn error_reply(status: u16, message: impl Into<String>) -> ApiReply {
    ApiReply {
        status,
        body: serde_json::json!({ "error": message.into() }),
    }
}

/// Map a failed submit to its HTTP status.
fn error_status(err: &AnalysisError) -> u16 {
    match err {
        AnalysisError::Validation(_) => 400,
        AnalysisError::Request(_) => 502,
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/state`: analyzer snapshot, dashboard, and samples.
pub fn get_state(app: &App) -> Result<ApiReply> {
    json_reply(
        200,
        &StateResponse {
            analyzer: app.snapshot(),
            dashboard: app.dashboard(),
            samples: &SAMPLE_REVIEWS,
        },
    )
}

/// `POST /api/analyze`: submit `{ "text": ... }`.
pub fn post_analyze(app: &mut App, body: &str) -> Result<ApiReply> {
    let Ok(req) = serde_json::from_str::<AnalyzeRequest>(body) else {
        return Ok(error_reply(400, "expected JSON body {\"text\": string}"));
    };

    match app.analyze(&req.text) {
        Ok(item) => json_reply(
            200,
            &AnalyzeResponse {
                result: app.snapshot().result,
                item,
                dashboard: app.dashboard(),
            },
        ),
        Err(err) => json_reply(
            error_status(&err),
            &NoticeResponse {
                notice: err.notice(),
                analyzer: app.snapshot(),
            },
        ),
    }
}

/// `POST /api/clear`: reset the input and dismiss the result.
pub fn post_clear(app: &mut App) -> Result<ApiReply> {
    app.clear();
    json_reply(
        200,
        &AnalyzerResponse {
            analyzer: app.snapshot(),
        },
    )
}

/// `POST /api/sample`: load sample `{ "index": n }` into the input.
pub fn post_sample(app: &mut App, body: &str) -> Result<ApiReply> {
    let Ok(req) = serde_json::from_str::<SampleRequest>(body) else {
        return Ok(error_reply(400, "expected JSON body {\"index\": number}"));
    };

    match app.pick_sample(req.index) {
        Some(_) => json_reply(
            200,
            &AnalyzerResponse {
                analyzer: app.snapshot(),
            },
        ),
        None => Ok(error_reply(404, format!("no sample at index {}", req.index))),
    }
}

/// `GET /api/samples`
pub fn get_samples() -> Result<ApiReply> {
    json_reply(200, &serde_json::json!({ "samples": SAMPLE_REVIEWS }))
}

/// `GET /api/dashboard`
pub fn get_dashboard(app: &App) -> Result<ApiReply> {
    json_reply(200, &app.dashboard())
}

/// `GET /api/history`: newest first.
pub fn get_history(app: &App) -> Result<ApiReply> {
    json_reply(
        200,
        &HistoryResponse {
            cap: HISTORY_CAP,
            items: app.history(),
        },
    )
}

/// `GET /api/config`: effective configuration as JSON and TOML.
pub fn get_config(config: &AppConfig) -> Result<ApiReply> {
    let toml_text = toml::to_string_pretty(config).unwrap_or_default();
    json_reply(200, &ConfigResponse { config, toml_text })
}

/// `GET /api/health`: endpoint reachability and local status.
pub fn get_health(app: &App, config: &AppConfig) -> Result<ApiReply> {
    let client = ClassifierClient::from_config(&config.endpoint);
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_path = crate::analytics::logger::EventLog::from_config(&config.logging)
        .map(|log| log.path().display().to_string());

    json_reply(
        200,
        &HealthResponse {
            endpoint_url: client.predict_url().to_string(),
            endpoint_healthy: client.is_healthy(),
            config_exists,
            logging_enabled: config.logging.enabled,
            log_path,
            history_len: app.history().len(),
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
