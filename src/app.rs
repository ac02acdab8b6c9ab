//! Page-level container: one analyzer and one session history.
//!
//! [`App`] is the single owner of the [`History`]. The analyzer borrows it as
//! a [`HistorySink`](crate::history::HistorySink) for the duration of a
//! submit and the dashboard borrows it as a read-only slice.

use crate::analytics::logger::EventLog;
use crate::analyzer::{AnalysisError, Analyzer, AnalyzerSnapshot};
use crate::classifier::{ClassifierClient, Classify};
use crate::config::AppConfig;
use crate::dashboard::DashboardView;
use crate::history::History;
use crate::model::AnalysisHistoryItem;

pub struct App {
    analyzer: Analyzer,
    history: History,
}

impl App {
    /// Wire the real HTTP classifier and event log described by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let classifier = ClassifierClient::from_config(&config.endpoint);
        let analyzer = Analyzer::new(Box::new(classifier))
            .with_event_log(EventLog::from_config(&config.logging));
        Self::with_analyzer(analyzer)
    }

    pub fn new(classifier: Box<dyn Classify>) -> Self {
        Self::with_analyzer(Analyzer::new(classifier))
    }

    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            history: History::new(),
        }
    }

    /// Replace the input with `text` and submit it.
    pub fn analyze(&mut self, text: &str) -> Result<AnalysisHistoryItem, AnalysisError> {
        self.analyzer.set_text(text);
        self.submit()
    }

    /// Submit whatever is currently in the input.
    pub fn submit(&mut self) -> Result<AnalysisHistoryItem, AnalysisError> {
        self.analyzer.submit(&mut self.history)
    }

    pub fn set_text(&mut self, text: &str) {
        self.analyzer.set_text(text);
    }

    pub fn clear(&mut self) {
        self.analyzer.clear();
    }

    pub fn pick_sample(&mut self, index: usize) -> Option<&'static str> {
        self.analyzer.pick_sample(index)
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn snapshot(&self) -> AnalyzerSnapshot {
        self.analyzer.snapshot()
    }

    /// Newest first.
    pub fn history(&self) -> &[AnalysisHistoryItem] {
        self.history.read()
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::from_history(self.history.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RequestError;
    use crate::model::{AnalysisResult, Sentiment};

    struct Fixed(Result<AnalysisResult, RequestError>);

    impl Classify for Fixed {
        fn classify(&self, _text: &str) -> Result<AnalysisResult, RequestError> {
            self.0.clone()
        }
    }

    fn app(sentiment: Sentiment, confidence: f64) -> App {
        App::new(Box::new(Fixed(Ok(AnalysisResult {
            sentiment,
            confidence,
        }))))
    }

    #[test]
    fn fresh_app_has_empty_dashboard() {
        let app = app(Sentiment::Positive, 0.9);
        assert!(app.history().is_empty());
        let view = app.dashboard();
        assert_eq!(view.total, 0);
        assert!(!view.has_data);
    }

    #[test]
    fn analyze_feeds_history_and_dashboard() {
        let mut app = app(Sentiment::Negative, 0.75);

        let first = app.analyze("The package arrived crushed and late.").unwrap();
        let second = app.analyze("Still waiting on a refund after three weeks.").unwrap();

        assert_eq!(app.history().len(), 2);
        assert_eq!(app.history()[0].id(), second.id());
        assert_eq!(app.history()[1].id(), first.id());

        let view = app.dashboard();
        assert_eq!(view.total, 2);
        assert_eq!(view.negative_count, 2);
        assert_eq!(view.avg_confidence_pct, "75%");
    }

    #[test]
    fn failed_analysis_leaves_dashboard_unchanged() {
        let mut app = App::new(Box::new(Fixed(Err(RequestError::Transport(
            "connection refused".to_string(),
        )))));

        assert!(app.analyze("A perfectly reasonable review text.").is_err());
        assert!(app.history().is_empty());
        assert_eq!(app.dashboard().total, 0);
        assert!(!app.snapshot().loading);
    }

    #[test]
    fn sample_then_submit_uses_sample_text() {
        let mut app = app(Sentiment::Positive, 0.88);
        let sample = app.pick_sample(0).unwrap();

        let item = app.submit().unwrap();

        assert_eq!(item.text(), sample);
        assert_eq!(app.analyzer().text(), sample);
    }

    #[test]
    fn clear_keeps_history() {
        let mut app = app(Sentiment::Neutral, 0.5);
        app.analyze("It was fine, nothing special either way.").unwrap();
        app.clear();

        assert_eq!(app.analyzer().text(), "");
        assert!(app.snapshot().result.is_none());
        assert_eq!(app.history().len(), 1);
    }
}
