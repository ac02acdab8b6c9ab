//! Review analyzer: input state and the request lifecycle.
//!
//! Owns the current review text, the loading flag, and the last result.
//! [`Analyzer::submit`] validates the text, performs exactly one
//! classification call, and on success hands a new
//! [`AnalysisHistoryItem`] to the caller's [`HistorySink`].
//!
//! Failures never escape as panics: callers receive an [`AnalysisError`]
//! and can render its [`Notice`].

pub mod samples;

use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::analytics::logger::{AnalysisEvent, EventLog};
use crate::classifier::{Classify, RequestError};
use crate::dashboard::format_percent;
use crate::history::HistorySink;
use crate::model::{AnalysisHistoryItem, AnalysisResult};

/// Minimum review length, counted in characters after trimming.
pub const MIN_REVIEW_CHARS: usize = 20;

/// Maximum review length accepted into the input box.
pub const MAX_REVIEW_CHARS: usize = 2000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The review is too short to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("review must be at least {min_chars} characters (got {actual_chars})")]
pub struct ValidationError {
    pub min_chars: usize,
    pub actual_chars: usize,
}

/// Why a submit did not produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// User-facing notice for a failed submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: &'static str,
    pub title: &'static str,
    pub message: String,
}

impl AnalysisError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(err) => Notice {
                kind: "validation",
                title: "Input Too Short",
                message: format!(
                    "Please enter a review with at least {} characters.",
                    err.min_chars
                ),
            },
            Self::Request(_) => Notice {
                kind: "request",
                title: "Analysis Failed",
                message: "An unexpected error occurred. Please check your connection or try again later."
                    .to_string(),
            },
        }
    }
}

/// Check that `text` is long enough to analyze.
pub fn validate_review(text: &str) -> Result<(), ValidationError> {
    let actual_chars = text.trim().chars().count();
    if actual_chars < MIN_REVIEW_CHARS {
        return Err(ValidationError {
            min_chars: MIN_REVIEW_CHARS,
            actual_chars,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Serializable view of the analyzer for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerSnapshot {
    pub text: String,
    pub char_count: usize,
    pub min_chars: usize,
    pub max_chars: usize,
    pub loading: bool,
    pub result: Option<ResultView>,
}

/// The last result plus its overlay formatting.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Confidence with one decimal, e.g. `"92.0%"`.
    pub confidence_pct: String,
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            result: result.clone(),
            confidence_pct: format_percent(result.confidence, 1),
        }
    }
}

pub struct Analyzer {
    classifier: Box<dyn Classify>,
    text: String,
    loading: bool,
    last_result: Option<AnalysisResult>,
    event_log: Option<EventLog>,
}

impl Analyzer {
    pub fn new(classifier: Box<dyn Classify>) -> Self {
        Self {
            classifier,
            text: String::new(),
            loading: false,
            last_result: None,
            event_log: None,
        }
    }

    /// Record every submit attempt to `log`.
    pub fn with_event_log(mut self, log: Option<EventLog>) -> Self {
        self.event_log = log;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    /// Replace the input, keeping at most [`MAX_REVIEW_CHARS`] characters.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(MAX_REVIEW_CHARS).collect();
    }

    /// Analyze the current text.
    ///
    /// On success the new item is appended to `history` and also returned.
    /// On failure `history` is untouched and the loading flag is cleared.
    pub fn submit(
        &mut self,
        history: &mut dyn HistorySink,
    ) -> Result<AnalysisHistoryItem, AnalysisError> {
        let text_chars = self.char_count();

        if let Err(err) = validate_review(&self.text) {
            self.record(AnalysisEvent::validation_failure(text_chars, &err));
            return Err(err.into());
        }

        self.loading = true;
        self.last_result = None;

        let start = Instant::now();
        let outcome = self.classifier.classify(&self.text);
        let latency_ms = start.elapsed().as_millis() as u64;

        self.loading = false;

        match outcome {
            Ok(result) => {
                let item = AnalysisHistoryItem::new(result.clone(), self.text.clone());
                history.append(item.clone());
                self.record(AnalysisEvent::success(&result, text_chars, latency_ms));
                self.last_result = Some(result);
                Ok(item)
            }
            Err(err) => {
                self.record(AnalysisEvent::request_failure(text_chars, latency_ms, &err));
                Err(err.into())
            }
        }
    }

    /// Reset the input and dismiss the last result.
    pub fn clear(&mut self) {
        self.text.clear();
        self.last_result = None;
    }

    /// Load sample `index` into the input. Returns `None` (and changes
    /// nothing) when there is no such sample.
    pub fn pick_sample(&mut self, index: usize) -> Option<&'static str> {
        let sample = samples::sample(index)?;
        self.set_text(sample);
        self.last_result = None;
        Some(sample)
    }

    pub fn snapshot(&self) -> AnalyzerSnapshot {
        AnalyzerSnapshot {
            text: self.text.clone(),
            char_count: self.char_count(),
            min_chars: MIN_REVIEW_CHARS,
            max_chars: MAX_REVIEW_CHARS,
            loading: self.loading,
            result: self.last_result.as_ref().map(ResultView::from),
        }
    }

    fn record(&self, event: AnalysisEvent) {
        if let Some(log) = &self.event_log {
            log.record(&event);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::history::{HISTORY_CAP, History};
    use crate::model::Sentiment;

    /// Scripted classifier that counts calls and replays a fixed outcome.
    struct Scripted {
        calls: Rc<Cell<usize>>,
        outcome: Result<AnalysisResult, RequestError>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl Classify for Scripted {
        fn classify(&self, text: &str) -> Result<AnalysisResult, RequestError> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(text.to_string());
            self.outcome.clone()
        }
    }

    fn analyzer_with(
        outcome: Result<AnalysisResult, RequestError>,
    ) -> (Analyzer, Rc<Cell<usize>>, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let classifier = Scripted {
            calls: Rc::clone(&calls),
            outcome,
            seen: Rc::clone(&seen),
        };
        (Analyzer::new(Box::new(classifier)), calls, seen)
    }

    fn positive(confidence: f64) -> Result<AnalysisResult, RequestError> {
        Ok(AnalysisResult {
            sentiment: Sentiment::Positive,
            confidence,
        })
    }

    const REVIEW: &str = "Great product, works as advertised!";

    #[test]
    fn short_input_is_rejected_without_request() {
        let (mut analyzer, calls, _) = analyzer_with(positive(0.9));
        let mut history = History::new();
        analyzer.set_text("Short");

        let err = analyzer.submit(&mut history).unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Validation(ValidationError {
                min_chars: 20,
                actual_chars: 5
            })
        );
        assert_eq!(calls.get(), 0);
        assert!(history.is_empty());
        assert!(!analyzer.is_loading());
        assert_eq!(analyzer.text(), "Short");
    }

    #[test]
    fn whitespace_does_not_count_toward_minimum() {
        let (mut analyzer, calls, _) = analyzer_with(positive(0.9));
        let mut history = History::new();
        analyzer.set_text("          too short          ");

        assert!(matches!(
            analyzer.submit(&mut history),
            Err(AnalysisError::Validation(_))
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn validation_failure_keeps_previous_result() {
        let (mut analyzer, _, _) = analyzer_with(positive(0.8));
        let mut history = History::new();
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();

        analyzer.set_text("tiny");
        assert!(analyzer.submit(&mut history).is_err());
        assert!(analyzer.last_result().is_some());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn exactly_twenty_characters_is_accepted() {
        assert!(validate_review("12345678901234567890").is_ok());
        assert!(validate_review("1234567890123456789").is_err());
        // Multi-byte characters count once each.
        assert!(validate_review(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn success_appends_item_and_stores_result() {
        let (mut analyzer, calls, seen) = analyzer_with(positive(0.92));
        let mut history = History::new();
        analyzer.set_text(REVIEW);

        let item = analyzer.submit(&mut history).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(seen.borrow().as_slice(), [REVIEW.to_string()]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.read()[0].id(), item.id());
        assert_eq!(item.text(), REVIEW);
        assert_eq!(
            analyzer.last_result(),
            Some(&AnalysisResult {
                sentiment: Sentiment::Positive,
                confidence: 0.92
            })
        );
        assert!(!analyzer.is_loading());
    }

    #[test]
    fn request_failure_leaves_history_untouched() {
        let (mut analyzer, calls, _) = analyzer_with(Err(RequestError::Status {
            status: 500,
            detail: None,
        }));
        let mut history = History::new();
        analyzer.set_text(REVIEW);

        let err = analyzer.submit(&mut history).unwrap_err();

        assert!(matches!(err, AnalysisError::Request(_)));
        assert_eq!(err.notice().title, "Analysis Failed");
        assert_eq!(calls.get(), 1);
        assert!(history.is_empty());
        assert!(!analyzer.is_loading());
        assert!(analyzer.last_result().is_none());
    }

    #[test]
    fn request_failure_clears_previous_result() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut analyzer = Analyzer::new(Box::new(Scripted {
            calls: Rc::clone(&calls),
            outcome: positive(0.7),
            seen: Rc::clone(&seen),
        }));
        let mut history = History::new();
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();
        assert!(analyzer.last_result().is_some());

        analyzer.classifier = Box::new(Scripted {
            calls,
            outcome: Err(RequestError::Unsuccessful { detail: None }),
            seen,
        });
        assert!(analyzer.submit(&mut history).is_err());
        assert!(analyzer.last_result().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn repeated_success_respects_history_cap() {
        let (mut analyzer, calls, _) = analyzer_with(positive(0.6));
        let mut history = History::new();

        let mut first_id = String::new();
        for n in 0..=HISTORY_CAP {
            analyzer.set_text(&format!("{REVIEW} #{n}"));
            let item = analyzer.submit(&mut history).unwrap();
            if n == 0 {
                first_id = item.id().to_string();
            }
        }

        assert_eq!(calls.get(), HISTORY_CAP + 1);
        assert_eq!(history.len(), HISTORY_CAP);
        assert!(history.read().iter().all(|i| i.id() != first_id));
    }

    #[test]
    fn set_text_truncates_to_max_chars() {
        let (mut analyzer, _, _) = analyzer_with(positive(0.5));
        analyzer.set_text(&"a".repeat(MAX_REVIEW_CHARS + 50));
        assert_eq!(analyzer.char_count(), MAX_REVIEW_CHARS);
    }

    #[test]
    fn clear_resets_text_and_result() {
        let (mut analyzer, _, _) = analyzer_with(positive(0.5));
        let mut history = History::new();
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();

        analyzer.clear();

        assert_eq!(analyzer.text(), "");
        assert!(analyzer.last_result().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn pick_sample_replaces_text_and_clears_result() {
        let (mut analyzer, calls, _) = analyzer_with(positive(0.5));
        let mut history = History::new();
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();

        let picked = analyzer.pick_sample(1).unwrap();

        assert_eq!(analyzer.text(), samples::SAMPLE_REVIEWS[1]);
        assert_eq!(picked, samples::SAMPLE_REVIEWS[1]);
        assert!(analyzer.last_result().is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn pick_sample_out_of_range_changes_nothing() {
        let (mut analyzer, _, _) = analyzer_with(positive(0.5));
        analyzer.set_text(REVIEW);
        assert!(analyzer.pick_sample(samples::SAMPLE_REVIEWS.len()).is_none());
        assert_eq!(analyzer.text(), REVIEW);
    }

    #[test]
    fn snapshot_formats_result_with_one_decimal() {
        let (mut analyzer, _, _) = analyzer_with(positive(0.92));
        let mut history = History::new();
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();

        let snap = analyzer.snapshot();
        assert_eq!(snap.char_count, REVIEW.chars().count());
        assert_eq!(snap.max_chars, 2000);
        let result = snap.result.unwrap();
        assert_eq!(result.confidence_pct, "92.0%");
    }

    #[test]
    fn validation_notice_names_minimum() {
        let err = AnalysisError::from(validate_review("short").unwrap_err());
        let notice = err.notice();
        assert_eq!(notice.kind, "validation");
        assert_eq!(notice.title, "Input Too Short");
        assert!(notice.message.contains("20 characters"));
    }

    #[test]
    fn event_log_records_each_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("events.jsonl"));
        let (analyzer, _, _) = analyzer_with(positive(0.75));
        let mut analyzer = analyzer.with_event_log(Some(log.clone()));
        let mut history = History::new();

        analyzer.set_text("nope");
        let _ = analyzer.submit(&mut history);
        analyzer.set_text(REVIEW);
        analyzer.submit(&mut history).unwrap();

        let events = log.read_all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, "validation_error");
        assert_eq!(events[1].outcome, "success");
        assert_eq!(events[1].sentiment.as_deref(), Some("Positive"));
    }
}
