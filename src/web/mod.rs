//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page review analyzer with the sentiment dashboard beside it
//! - JSON API endpoints over one in-memory [`App`]
//!
//! Launched via `sentiment-insights web` (default: `http://127.0.0.1:9746`).

pub mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::app::App;
use crate::config::AppConfig;

use api::ApiReply;

/// Session state shared by every request: one app, one resolved config.
pub struct WebState {
    pub app: App,
    pub config: AppConfig,
}

impl WebState {
    pub fn new(app: App, config: AppConfig) -> Self {
        Self { app, config }
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self::new(App::from_config(&config), config)
    }
}

/// What a routed request produced.
#[derive(Debug)]
pub enum Reply {
    Html(&'static str),
    Json(ApiReply),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Html(_) => 200,
            Self::Json(reply) => reply.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server.
///
/// Blocks the current thread. Requests are handled one at a time, so an
/// analysis in flight holds off every other request until it finishes.
/// Errors are handled per-request without stopping the server.
pub fn serve(mut state: WebState, open: bool) -> Result<()> {
    let addr = state.config.web.addr.clone();
    let server = Server::http(addr.as_str())
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("sentiment-insights dashboard running at http://{addr}");
    println!("Classifying via {}", state.config.endpoint.url);
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = dispatch(&mut state, &method, &url, body.as_deref()).unwrap_or_else(|e| {
            Reply::Json(ApiReply {
                status: 500,
                body: serde_json::json!({ "error": e.to_string() }),
            })
        });
        let status = reply.status();
        let _ = request.respond(into_response(reply));

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn dispatch(
    state: &mut WebState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Reply> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("{}");

    let reply = match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            return Ok(Reply::Html(frontend::INDEX_HTML));
        }

        // API: analyzer
        (&Method::Get, "/api/state") => api::get_state(&state.app)?,
        (&Method::Post, "/api/analyze") => api::post_analyze(&mut state.app, body)?,
        (&Method::Post, "/api/clear") => api::post_clear(&mut state.app)?,
        (&Method::Post, "/api/sample") => api::post_sample(&mut state.app, body)?,
        (&Method::Get, "/api/samples") => api::get_samples()?,

        // API: dashboard
        (&Method::Get, "/api/dashboard") => api::get_dashboard(&state.app)?,
        (&Method::Get, "/api/history") => api::get_history(&state.app)?,

        // API: diagnostics
        (&Method::Get, "/api/health") => api::get_health(&state.app, &state.config)?,
        (&Method::Get, "/api/config") => api::get_config(&state.config)?,

        _ => not_found(),
    };

    Ok(Reply::Json(reply))
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    match reply {
        Reply::Html(html) => with_content_type(
            Response::from_data(html.as_bytes().to_vec()),
            "text/html; charset=utf-8",
        )
        .with_status_code(StatusCode(200)),
        Reply::Json(reply) => json_response(&reply),
    }
}

fn json_response(reply: &ApiReply) -> Response<Cursor<Vec<u8>>> {
    with_content_type(
        Response::from_data(reply.body.to_string().into_bytes()),
        "application/json; charset=utf-8",
    )
    .with_status_code(StatusCode(reply.status))
}

fn not_found() -> ApiReply {
    ApiReply {
        status: 404,
        body: serde_json::json!({ "error": "not found" }),
    }
}

/// Attach a `Content-Type` header.
fn with_content_type(
    response: Response<Cursor<Vec<u8>>>,
    value: &str,
) -> Response<Cursor<Vec<u8>>> {
    match Header::from_bytes("Content-Type", value) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
