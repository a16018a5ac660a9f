//! Tracks when application pairs were last added or updated.
//!
//! The index only feeds the `recentlyAdded` statistic. It is not persisted
//! and starts empty on every process start.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use appcat_types::AppEntry;

/// Width of the "recently added" window.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Composite key: category, application name, publisher.
///
/// The category component is lower-cased so the key follows the
/// case-insensitive category rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecencyKey {
    pub category: String,
    pub name: String,
    pub publisher: String,
}

impl RecencyKey {
    pub fn new(category: &str, entry: &AppEntry) -> Self {
        Self {
            category: category.to_lowercase(),
            name: entry.name.clone(),
            publisher: entry.publisher.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecencyIndex {
    stamps: HashMap<RecencyKey, DateTime<Utc>>,
}

impl RecencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or refresh the timestamp for a pair.
    pub fn touch(&mut self, category: &str, entry: &AppEntry, at: DateTime<Utc>) {
        self.stamps.insert(RecencyKey::new(category, entry), at);
    }

    /// Drop the entry for a pair. Returns `true` if one existed.
    pub fn forget(&mut self, category: &str, entry: &AppEntry) -> bool {
        self.stamps.remove(&RecencyKey::new(category, entry)).is_some()
    }

    pub fn get(&self, category: &str, entry: &AppEntry) -> Option<DateTime<Utc>> {
        self.stamps.get(&RecencyKey::new(category, entry)).copied()
    }

    /// Number of entries stamped strictly after `cutoff`.
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.stamps.values().filter(|at| **at > cutoff).count()
    }

    /// Number of entries inside the recent window ending at `now`.
    pub fn recent_count(&self, now: DateTime<Utc>) -> usize {
        self.count_since(now - Duration::hours(RECENT_WINDOW_HOURS))
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
