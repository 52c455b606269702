//! In-memory reading history

use crate::record::ResultRecord;
use serde::Serialize;

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// The question as asked
    pub question: String,
    /// The extracted reading
    pub result: ResultRecord,
}

/// Append-only list of readings, oldest first.
///
/// Lives only as long as the session that owns it; nothing is persisted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading
    pub fn push(&mut self, question: impl Into<String>, result: ResultRecord) {
        self.entries.push(HistoryEntry {
            question: question.into(),
            result,
        });
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries, newest first (display order)
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
