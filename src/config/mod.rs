//! Configuration system for sentiment-insights.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: [`schema::AppConfig::default()`]
//! 2. **User global config**: `~/.sentiment-insights/config.toml`
//! 3. **Project local config**: `.sentiment-insights.toml` in the current directory
//! 4. **Environment variables**: `SENTIMENT_*` overrides (highest precedence)
//!
//! Layers merge at the field level: a file that only sets `endpoint.url`
//! leaves every other value from the previous layer in place.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::AppConfig;

/// Directory name under `$HOME` for config and logs.
const DATA_DIR_NAME: &str = ".sentiment-insights";

/// Project-local config file name.
const PROJECT_CONFIG_NAME: &str = ".sentiment-insights.toml";

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration: defaults → global TOML →
/// project TOML → environment variables.
pub fn load() -> AppConfig {
    let mut config = load_from(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the built-in defaults, in order.
///
/// Missing, unreadable or malformed files are skipped, as is any layer whose
/// values do not fit the schema (e.g. a string where a number belongs).
pub fn load_from(paths: &[Option<PathBuf>]) -> AppConfig {
    let Ok(mut merged) = toml::Value::try_from(AppConfig::default()) else {
        return AppConfig::default();
    };

    for path in paths.iter().flatten() {
        let Some(layer) = read_toml_value(path) else {
            continue;
        };

        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        if candidate.clone().try_into::<AppConfig>().is_ok() {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively overlay `overlay` onto `base`. Tables merge key by key;
/// any other value replaces what was there.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.sentiment-insights/`, home of the global config and the event log.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(PROJECT_CONFIG_NAME))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// - `SENTIMENT_ENDPOINT_URL`: classification route
/// - `SENTIMENT_TIMEOUT_MS`: request timeout
/// - `SENTIMENT_WEB_ADDR`: dashboard listen address
/// - `SENTIMENT_LOG`: event log on/off (`1`/`true`/`yes`/`on`)
/// - `SENTIMENT_LOG_PATH`: event log location
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("SENTIMENT_ENDPOINT_URL")
        && !val.is_empty()
    {
        config.endpoint.url = val;
    }
    if let Ok(val) = std::env::var("SENTIMENT_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
        && ms > 0
    {
        config.endpoint.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("SENTIMENT_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("SENTIMENT_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("SENTIMENT_LOG_PATH")
        && !val.is_empty()
    {
        config.logging.path = Some(val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.sentiment-insights/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(&path, AppConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `endpoint.timeout_ms`) in the global
/// config file, creating the file if needed.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_in(&path, key, value)
}

/// Set a dotted key in the TOML file at `path`.
pub fn set_config_value_in(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::Table(toml::Table::new())
    };

    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Every settable key with a value of the right type.
fn schema_value() -> Result<toml::Value> {
    let mut schema =
        toml::Value::try_from(AppConfig::default()).context("failed to serialize defaults")?;
    if let Some(logging) = schema.get_mut("logging").and_then(|v| v.as_table_mut()) {
        logging.insert("path".to_string(), toml::Value::String(String::new()));
    }
    Ok(schema)
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The key must exist in the schema; the raw value is parsed to the type the
/// schema declares for it. Missing intermediate tables are created.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let schema = schema_value()?;
    let template = key
        .split('.')
        .try_fold(&schema, |node, part| node.get(part))
        .filter(|node| !node.is_table())
        .with_context(|| format!("unknown config key: '{key}'"))?;

    let new_value = match template {
        toml::Value::Boolean(_) => toml::Value::Boolean(is_truthy(raw_value)),
        toml::Value::Integer(_) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            if n < 0 {
                anyhow::bail!("expected a non-negative integer for '{key}', got '{raw_value}'");
            }
            if n == 0 && key == "endpoint.timeout_ms" {
                anyhow::bail!("'{key}' must be greater than zero");
            }
            toml::Value::Integer(n)
        }
        toml::Value::Float(_) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table while resolving '{key}'"))?;
        current = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table while resolving '{key}'"))?;
    table.insert(leaf.to_string(), new_value);

    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
