use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{batch::BatchResult, config::DEFAULT_HISTORY_CAPACITY};

/// A scored search kept in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Search terms as typed by the user.
    pub query: String,
    /// When the search was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Scores for the returned descriptions.
    pub result: BatchResult,
}

impl HistoryEntry {
    /// Creates a new entry stamped with the current time.
    #[must_use]
    pub fn new(query: impl Into<String>, result: BatchResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            recorded_at: Utc::now(),
            result,
        }
    }
}

/// Bounded, newest-first record of recent searches.
#[derive(Debug)]
pub struct SearchHistory {
    capacity: usize,
    entries: RwLock<VecDeque<HistoryEntry>>,
}

impl SearchHistory {
    /// Creates a history holding at most `capacity` entries (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stores a search at the front, evicting the oldest beyond capacity.
    pub fn record(&self, query: impl Into<String>, result: BatchResult) -> HistoryEntry {
        let entry = HistoryEntry::new(query, result);
        let mut entries = self.entries.write();
        entries.push_front(entry.clone());
        entries.truncate(self.capacity);
        entry
    }

    /// Up to `limit` entries, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.read().iter().take(limit).cloned().collect()
    }

    /// All retained entries, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
