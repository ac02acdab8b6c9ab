//! Bounded, newest-first log of completed analyses for the current session.
//!
//! The [`History`] is owned by the page container ([`crate::app::App`]).
//! Producers only ever see it through [`HistorySink`]; readers get a shared
//! slice from [`History::read`].

use crate::model::AnalysisHistoryItem;

/// Maximum number of analyses retained. Older entries are dropped.
pub const HISTORY_CAP: usize = 20;

/// Append-only capability over a history log.
pub trait HistorySink {
    fn append(&mut self, item: AnalysisHistoryItem);
}

/// In-memory history, newest first, never longer than [`HISTORY_CAP`].
#[derive(Debug, Clone, Default)]
pub struct History {
    items: Vec<AnalysisHistoryItem>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries, newest first.
    pub fn read(&self) -> &[AnalysisHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl HistorySink for History {
    /// Prepend `item`, then drop whatever falls beyond the cap.
    fn append(&mut self, item: AnalysisHistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
