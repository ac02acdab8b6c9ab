//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `sentiment-insights analyze`: batch-analyze reviews and print a dashboard
//! - `sentiment-insights samples`: list the built-in sample reviews
//! - `sentiment-insights health`: check config, endpoint, and event log
//! - `sentiment-insights config show|init|set|reset`: configuration management

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use serde::Serialize;

use crate::analytics::logger::EventLog;
use crate::analyzer::samples::SAMPLE_REVIEWS;
use crate::analyzer::{AnalysisError, Notice};
use crate::app::App;
use crate::classifier::ClassifierClient;
use crate::config;
use crate::dashboard::{Category, DashboardView, display_category, format_percent};
use crate::model::AnalysisHistoryItem;

/// Runs of whitespace, collapsed for single-line previews.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

/// Preview width for review text in table output.
const PREVIEW_CHARS: usize = 48;

/// Output format for the analyze command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// sentiment-insights analyze
// ---------------------------------------------------------------------------

/// Outcome of one review in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub text: String,
    pub outcome: Result<AnalysisHistoryItem, AnalysisError>,
}

/// Analyze each review through the configured endpoint, then print every
/// outcome and the resulting dashboard.
pub fn run_analyze(texts: &[String], file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let reviews = collect_reviews(texts, file)?;
    let cfg = config::load();
    let mut app = App::from_config(&cfg);

    if format == OutputFormat::Table {
        println!(
            "{} {} review(s) via {}",
            "Analyzing".bold().cyan(),
            reviews.len(),
            cfg.endpoint.url.dimmed()
        );
        println!();
    }

    let outcomes = analyze_batch(&mut app, &reviews);
    let view = app.dashboard();

    match format {
        OutputFormat::Json => print_batch_json(&outcomes, &view)?,
        OutputFormat::Csv => print_batch_csv(&outcomes),
        OutputFormat::Table => print_batch_table(&outcomes, &view),
    }

    Ok(())
}

/// Gather reviews from arguments and from the non-empty lines of `file`.
pub fn collect_reviews(texts: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut reviews: Vec<String> = texts.to_vec();

    if let Some(path) = file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read reviews from {}", path.display()))?;
        reviews.extend(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
    }

    if reviews.is_empty() {
        anyhow::bail!("no reviews given. Pass review text as arguments or use --file.");
    }

    Ok(reviews)
}

/// Submit every review in order. A failed review does not stop the batch.
pub fn analyze_batch(app: &mut App, reviews: &[String]) -> Vec<BatchOutcome> {
    reviews
        .iter()
        .map(|text| BatchOutcome {
            text: text.clone(),
            outcome: app.analyze(text),
        })
        .collect()
}

fn print_batch_table(outcomes: &[BatchOutcome], view: &DashboardView) {
    for outcome in outcomes {
        let preview = truncate(&collapse_whitespace(&outcome.text), PREVIEW_CHARS);
        match &outcome.outcome {
            Ok(item) => {
                let label = format!("{:<10}", item.sentiment().label());
                println!(
                    "  {} {} {:>6}  {}",
                    "✓".green().bold(),
                    colorize_category(display_category(item.sentiment()), &label),
                    format_percent(item.confidence(), 1),
                    preview.dimmed()
                );
            }
            Err(err) => {
                let notice = err.notice();
                println!(
                    "  {} {:<17}  {}",
                    "✗".red().bold(),
                    notice.title.red(),
                    preview.dimmed()
                );
                if let AnalysisError::Request(req) = err {
                    println!("      {}", req.to_string().dimmed());
                }
            }
        }
    }
    println!();
    print_dashboard_table(view);
}

fn print_dashboard_table(view: &DashboardView) {
    println!("{}", "Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Total:         ".bold(), view.total);
    println!("  {} {}", "Avg. Conf.:    ".bold(), view.avg_confidence_pct);
    println!();

    println!("{}", "Sentiment Ratio".bold().cyan());
    if !view.has_data {
        println!("  {}", "No data to display".yellow());
    } else {
        for entry in &view.breakdown {
            let label = format!("{:<10}", entry.name.label());
            println!(
                "  {} {:>4}  {:>4}  {}",
                colorize_category(entry.name, &label),
                entry.value,
                format_percent(entry.share, 0),
                bar(entry.share, 30)
            );
        }
        if view.unrecognized_count > 0 {
            println!(
                "  {}",
                format!(
                    "{} neutral item(s) carried an unrecognized label",
                    view.unrecognized_count
                )
                .dimmed()
            );
        }
    }
    println!();

    println!("{}", "Recent History".bold().cyan());
    if view.recent.is_empty() {
        println!("  {}", "No analyses yet.".yellow());
        return;
    }
    for (i, entry) in view.recent.iter().enumerate() {
        let line = format!(
            "  {:<10} {:>5}  {}",
            entry.sentiment,
            entry.confidence_pct,
            truncate(&collapse_whitespace(&entry.text), PREVIEW_CHARS)
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    text: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<&'a AnalysisHistoryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn print_batch_json(outcomes: &[BatchOutcome], view: &DashboardView) -> Result<()> {
    let results: Vec<JsonOutcome> = outcomes
        .iter()
        .map(|o| match &o.outcome {
            Ok(item) => JsonOutcome {
                text: &o.text,
                ok: true,
                item: Some(item),
                notice: None,
                error: None,
            },
            Err(err) => JsonOutcome {
                text: &o.text,
                ok: false,
                item: None,
                notice: Some(err.notice()),
                error: Some(err.to_string()),
            },
        })
        .collect();

    let value = serde_json::json!({
        "results": results,
        "dashboard": view,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_batch_csv(outcomes: &[BatchOutcome]) {
    println!("index,status,sentiment,confidence,text");
    for (i, o) in outcomes.iter().enumerate() {
        match &o.outcome {
            Ok(item) => println!(
                "{},ok,{},{:.4},{}",
                i + 1,
                csv_field(item.sentiment().label()),
                item.confidence(),
                csv_field(&o.text)
            ),
            Err(err) => println!(
                "{},{},,,{}",
                i + 1,
                err.notice().kind,
                csv_field(&o.text)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// sentiment-insights samples
// ---------------------------------------------------------------------------

pub fn run_samples() -> Result<()> {
    println!("{}", "Sample Reviews".bold().cyan());
    println!("{}", "=".repeat(50));
    for (i, sample) in SAMPLE_REVIEWS.iter().enumerate() {
        println!("  {} {}", format!("[{i}]").bold(), sample);
    }
    println!();
    println!(
        "  {} pick one in the web dashboard, or pass it to `sentiment-insights analyze`",
        "Hint:".dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// sentiment-insights health
// ---------------------------------------------------------------------------

pub fn run_health() -> Result<()> {
    println!("{}", "Sentiment Insights Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.sentiment-insights/config.toml found"
        } else {
            "not found (run `sentiment-insights config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".sentiment-insights.toml found"
        } else {
            "none (optional)"
        },
    );

    // 1. Endpoint reachability
    let client = ClassifierClient::from_config(&cfg.endpoint);
    let endpoint_ok = client.is_healthy();
    let endpoint_detail = if endpoint_ok {
        format!("healthy at {}", client.health_url())
    } else {
        format!("not reachable at {}", client.health_url())
    };
    print_health_item("Classification endpoint", endpoint_ok, &endpoint_detail);
    print_health_item(
        "Request timeout",
        true,
        &format!("{} ms", cfg.endpoint.timeout_ms),
    );

    // 2. Event log
    match EventLog::from_config(&cfg.logging) {
        Some(log) => {
            let exists = log.path().exists();
            let detail = if exists {
                format!("{} events in {}", log.read_all().len(), log.path().display())
            } else {
                format!("no events yet ({})", log.path().display())
            };
            print_health_item("Event log", exists, &detail);
        }
        None => print_health_item("Event log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// sentiment-insights config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.sentiment-insights/config.toml", global_exists);
    print_source(".sentiment-insights.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SENTIMENT_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.sentiment-insights/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your own endpoint.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_chars` characters, appending "…" if truncated.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").into_owned()
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Horizontal bar of `width` cells filled to `share`.
fn bar(share: f64, width: usize) -> String {
    let filled = ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn colorize_category(category: Category, text: &str) -> colored::ColoredString {
    match category {
        Category::Positive => text.green(),
        Category::Negative => text.red(),
        Category::Neutral => text.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classify, RequestError};
    use crate::model::{AnalysisResult, Sentiment};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\tb   c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_csv_field() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(0.0, 3), "░░░");
        assert_eq!(bar(1.5, 2), "██");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn collect_reviews_reads_args_and_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.txt");
        fs::write(&path, "first line review\n\n   \nsecond line review\n").unwrap();

        let reviews = collect_reviews(&["from args".to_string()], Some(&path)).unwrap();

        assert_eq!(
            reviews,
            vec!["from args", "first line review", "second line review"]
        );
    }

    #[test]
    fn collect_reviews_requires_input() {
        assert!(collect_reviews(&[], None).is_err());
    }

    #[test]
    fn collect_reviews_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_reviews(&[], Some(&dir.path().join("absent.txt"))).unwrap_err();
        assert!(err.to_string().contains("failed to read reviews"));
    }

    struct Fixed;

    impl Classify for Fixed {
        fn classify(&self, _text: &str) -> Result<AnalysisResult, RequestError> {
            Ok(AnalysisResult {
                sentiment: Sentiment::Positive,
                confidence: 0.8,
            })
        }
    }

    #[test]
    fn batch_continues_past_failures() {
        let mut app = App::new(Box::new(Fixed));
        let reviews = vec![
            "too short".to_string(),
            "This one is definitely long enough to analyze.".to_string(),
        ];

        let outcomes = analyze_batch(&mut app, &reviews);

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].outcome, Err(AnalysisError::Validation(_))));
        assert!(outcomes[1].outcome.is_ok());
        assert_eq!(app.dashboard().total, 1);
    }
}
