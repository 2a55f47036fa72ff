//! Bounded, chronological log of accepted snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Metric, MetricsSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub commit: String,
    pub branch: String,
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub coverage: Option<f64>,
    #[serde(default)]
    pub bundle_size: Option<u64>,
}

impl HistoryEntry {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Performance => self.performance,
            Metric::Coverage => self.coverage,
            Metric::BundleSize => self.bundle_size.map(|b| b as f64),
        }
    }
}

impl From<&MetricsSnapshot> for HistoryEntry {
    fn from(s: &MetricsSnapshot) -> Self {
        let values = s.values();
        Self {
            timestamp: s.timestamp,
            commit: s.commit.clone(),
            branch: s.branch.clone(),
            performance: values.performance,
            coverage: values.coverage,
            bundle_size: values.bundle_size,
        }
    }
}

/// Insertion order is chronological order; oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Appends `entry` and drops the oldest entries beyond `limit`.
    /// Returns how many entries were evicted.
    pub fn push_bounded(&mut self, entry: HistoryEntry, limit: usize) -> usize {
        self.entries.push(entry);
        self.truncate_to(limit)
    }

    /// Keeps only the newest `limit` entries.
    pub fn truncate_to(&mut self, limit: usize) -> usize {
        let excess = self.entries.len().saturating_sub(limit);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Present values of `metric` within the newest `window` entries.
    pub fn series(&self, metric: Metric, window: usize) -> Vec<f64> {
        self.recent(window)
            .iter()
            .filter_map(|e| e.value(metric))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: u64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc::now(),
            commit: format!("c{i}"),
            branch: "main".into(),
            performance: Some(i as f64),
            coverage: None,
            bundle_size: Some(i * 1000),
        }
    }

    #[test]
    fn test_cap_evicts_single_oldest() {
        let mut history = History::from_entries((0..50).map(entry).collect());
        let evicted = history.push_bounded(entry(50), 50);
        assert_eq!(evicted, 1);
        assert_eq!(history.len(), 50);
        assert_eq!(history.entries()[0].commit, "c1");
        assert_eq!(history.entries()[49].commit, "c50");
    }

    #[test]
    fn test_push_below_cap_keeps_everything() {
        let mut history = History::new();
        assert_eq!(history.push_bounded(entry(0), 3), 0);
        assert_eq!(history.push_bounded(entry(1), 3), 0);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_oversized_history_is_truncated_on_push() {
        let mut history = History::from_entries((0..10).map(entry).collect());
        let evicted = history.push_bounded(entry(10), 5);
        assert_eq!(evicted, 6);
        assert_eq!(history.entries()[0].commit, "c6");
    }

    #[test]
    fn test_series_uses_trailing_window_and_skips_absent() {
        let mut entries: Vec<HistoryEntry> = (0..8).map(entry).collect();
        entries[6].performance = None;
        let history = History::from_entries(entries);
        assert_eq!(history.series(Metric::Performance, 3), vec![5.0, 7.0]);
        assert!(history.series(Metric::Coverage, 5).is_empty());
        assert_eq!(history.recent(100).len(), 8);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let history = History::from_entries(vec![entry(1)]);
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["bundleSize"], 1000);
        assert!(json[0]["coverage"].is_null());
    }
}
