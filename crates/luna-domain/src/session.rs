//! Per-session context

use crate::history::History;
use crate::record::ResultRecord;

/// State owned by one user session.
///
/// Presenters pass a `Session` around explicitly instead of keeping a
/// process-wide history, so two sessions never see each other's readings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: String,
    history: History,
}

impl Session {
    /// Start a session with an empty history
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: History::new(),
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Readings recorded so far
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Append a successful reading to this session's history
    pub fn record(&mut self, question: impl Into<String>, result: ResultRecord) {
        self.history.push(question, result);
    }
}
