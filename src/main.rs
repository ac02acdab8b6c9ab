use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sentiment_insights::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "sentiment-insights")]
#[command(about = "Customer review sentiment analysis with a live dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the analyzer and dashboard in the browser
    Web {
        /// Listen address (default from config: 127.0.0.1:9746)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Analyze one or more reviews and print the resulting dashboard
    Analyze {
        /// Review texts, one per argument
        texts: Vec<String>,
        /// Read additional reviews from a file, one per non-empty line
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the built-in sample reviews
    Samples,
    /// Check config, endpoint reachability, and the event log
    Health,
    /// View and manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write a default config to ~/.sentiment-insights/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `endpoint.timeout_ms 5000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Web { addr, no_open } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.web.addr = addr;
            }
            let open = cfg.web.open_browser && !no_open;
            web::serve(web::WebState::from_config(cfg), open)
        }
        Commands::Analyze {
            texts,
            file,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_analyze(&texts, file.as_deref(), fmt)
        }
        Commands::Samples => cli::run_samples(),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
