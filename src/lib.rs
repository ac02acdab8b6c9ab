//! Sentiment Insights: customer review sentiment analysis with a live
//! session dashboard.
//!
//! Reviews are classified by a remote HTTP endpoint; everything else
//! (validation, bounded session history, dashboard aggregation, the web UI
//! and the CLI) lives here.

pub mod analytics;
pub mod analyzer;
pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod model;
pub mod web;
