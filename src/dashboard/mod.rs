//! Dashboard aggregation: a pure view over the history slice.
//!
//! Computes the statistics cards (total, average confidence), the sentiment
//! ratio breakdown for the chart, and the recent-history list. Nothing here
//! mutates the history or keeps state between calls.

use serde::Serialize;

use crate::model::{AnalysisHistoryItem, Sentiment};

// ---------------------------------------------------------------------------
// Display categories
// ---------------------------------------------------------------------------

/// The three buckets the dashboard counts and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

/// Bucket a sentiment for display.
///
/// Anything that is not exactly Positive or Negative, including
/// unrecognized labels, counts as Neutral.
pub fn display_category(sentiment: &Sentiment) -> Category {
    match sentiment {
        Sentiment::Positive => Category::Positive,
        Sentiment::Negative => Category::Negative,
        Sentiment::Neutral | Sentiment::Unrecognized(_) => Category::Neutral,
    }
}

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One slice of the sentiment ratio chart. Never has `value == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub name: Category,
    pub value: usize,
    /// Share of the total, in `[0, 1]`.
    pub share: f64,
}

/// A row of the recent-history panel.
#[derive(Debug, Clone, Serialize)]
pub struct RecentEntry {
    pub id: String,
    pub text: String,
    /// Raw sentiment label as received.
    pub sentiment: String,
    pub category: Category,
    /// Rounded whole percentage, e.g. `"92%"`.
    pub confidence_pct: String,
}

/// Everything the dashboard panel renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Items counted as neutral because their label was not recognized.
    pub unrecognized_count: usize,
    pub avg_confidence: f64,
    pub avg_confidence_pct: String,
    pub breakdown: Vec<BreakdownEntry>,
    /// `false` means render the "no data" state instead of a chart.
    pub has_data: bool,
    pub recent: Vec<RecentEntry>,
}

impl DashboardView {
    pub fn from_history(history: &[AnalysisHistoryItem]) -> Self {
        let total = history.len();
        let positive_count = count_category(history, Category::Positive);
        let negative_count = count_category(history, Category::Negative);
        let neutral_count = total - positive_count - negative_count;
        let unrecognized_count = history
            .iter()
            .filter(|item| !item.sentiment().is_recognized())
            .count();

        let avg_confidence = mean_confidence(history);
        let breakdown = breakdown(positive_count, negative_count, neutral_count);
        let has_data = !breakdown.is_empty();

        let recent = history
            .iter()
            .map(|item| RecentEntry {
                id: item.id().to_string(),
                text: item.text().to_string(),
                sentiment: item.sentiment().label().to_string(),
                category: display_category(item.sentiment()),
                confidence_pct: format_percent(item.confidence(), 0),
            })
            .collect();

        Self {
            total,
            positive_count,
            negative_count,
            neutral_count,
            unrecognized_count,
            avg_confidence,
            avg_confidence_pct: format_percent(avg_confidence, 0),
            breakdown,
            has_data,
            recent,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation helpers
// ---------------------------------------------------------------------------

fn count_category(history: &[AnalysisHistoryItem], category: Category) -> usize {
    history
        .iter()
        .filter(|item| display_category(item.sentiment()) == category)
        .count()
}

/// Arithmetic mean of confidences; exactly `0.0` for an empty history.
pub fn mean_confidence(history: &[AnalysisHistoryItem]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(|item| item.confidence()).sum::<f64>() / history.len() as f64
}

/// Chart slices in Positive, Negative, Neutral order, skipping empty ones.
pub fn breakdown(positive: usize, negative: usize, neutral: usize) -> Vec<BreakdownEntry> {
    let total = positive + negative + neutral;
    [
        (Category::Positive, positive),
        (Category::Negative, negative),
        (Category::Neutral, neutral),
    ]
    .into_iter()
    .filter(|&(_, value)| value > 0)
    .map(|(name, value)| BreakdownEntry {
        name,
        value,
        share: value as f64 / total as f64,
    })
    .collect()
}

/// Format a `[0, 1]` fraction as a percentage string.
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalysisResult;

    fn item(sentiment: &str, confidence: f64) -> AnalysisHistoryItem {
        AnalysisHistoryItem::new(
            AnalysisResult {
                sentiment: Sentiment::from(sentiment),
                confidence,
            },
            format!("{sentiment} review text for testing"),
        )
    }

    #[test]
    fn empty_history_has_zero_average_and_no_data() {
        let view = DashboardView::from_history(&[]);
        assert_eq!(view.total, 0);
        assert_eq!(view.avg_confidence, 0.0);
        assert_eq!(view.avg_confidence_pct, "0%");
        assert!(view.breakdown.is_empty());
        assert!(!view.has_data);
        assert!(view.recent.is_empty());
    }

    #[test]
    fn counts_and_average() {
        let history = vec![
            item("Positive", 0.9),
            item("Negative", 0.6),
            item("Positive", 0.8),
            item("Neutral", 0.5),
        ];
        let view = DashboardView::from_history(&history);

        assert_eq!(view.total, 4);
        assert_eq!(view.positive_count, 2);
        assert_eq!(view.negative_count, 1);
        assert_eq!(view.neutral_count, 1);
        assert!((view.avg_confidence - 0.7).abs() < 1e-9);
        assert_eq!(view.avg_confidence_pct, "70%");
        assert!(view.has_data);
    }

    #[test]
    fn average_is_order_independent() {
        let mut history = vec![item("Positive", 0.91), item("Negative", 0.33), item("Neutral", 0.47)];
        let forward = mean_confidence(&history);
        history.reverse();
        assert!((forward - mean_confidence(&history)).abs() < 1e-12);
    }

    #[test]
    fn unrecognized_labels_fold_into_neutral() {
        let history = vec![item("Mixed", 0.4), item("positive", 0.6), item("Negative", 0.8)];
        let view = DashboardView::from_history(&history);

        assert_eq!(view.positive_count, 0);
        assert_eq!(view.negative_count, 1);
        assert_eq!(view.neutral_count, 2);
        assert_eq!(view.unrecognized_count, 2);
        assert_eq!(view.recent[0].sentiment, "Mixed");
        assert_eq!(view.recent[0].category, Category::Neutral);
    }

    #[test]
    fn display_category_folds_everything_else() {
        assert_eq!(display_category(&Sentiment::Positive), Category::Positive);
        assert_eq!(display_category(&Sentiment::Negative), Category::Negative);
        assert_eq!(display_category(&Sentiment::Neutral), Category::Neutral);
        assert_eq!(
            display_category(&Sentiment::Unrecognized("NEGATIVE".into())),
            Category::Neutral
        );
    }

    #[test]
    fn breakdown_omits_zero_categories() {
        let entries = breakdown(3, 0, 1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, Category::Positive);
        assert_eq!(entries[0].value, 3);
        assert!((entries[0].share - 0.75).abs() < 1e-9);
        assert_eq!(entries[1].name, Category::Neutral);
        assert!(entries.iter().all(|e| e.value > 0));
    }

    #[test]
    fn breakdown_of_nothing_is_empty() {
        assert!(breakdown(0, 0, 0).is_empty());
    }

    #[test]
    fn recent_keeps_history_order_and_rounds() {
        let history = vec![item("Negative", 0.876), item("Positive", 0.92)];
        let view = DashboardView::from_history(&history);

        assert_eq!(view.recent.len(), 2);
        assert_eq!(view.recent[0].id, history[0].id());
        assert_eq!(view.recent[0].confidence_pct, "88%");
        assert_eq!(view.recent[1].confidence_pct, "92%");
    }

    #[test]
    fn format_percent_decimals() {
        assert_eq!(format_percent(0.92, 0), "92%");
        assert_eq!(format_percent(0.92, 1), "92.0%");
        assert_eq!(format_percent(0.8746, 1), "87.5%");
        assert_eq!(format_percent(1.0, 0), "100%");
    }

    #[test]
    fn input_slice_is_not_modified() {
        let history = vec![item("Positive", 0.9), item("Neutral", 0.4)];
        let ids: Vec<String> = history.iter().map(|i| i.id().to_string()).collect();
        let _ = DashboardView::from_history(&history);
        let _ = DashboardView::from_history(&history);
        let after: Vec<String> = history.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, after);
    }
}
