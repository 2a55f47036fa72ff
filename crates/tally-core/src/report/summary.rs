//! summary.json and rejection.json records.
//!
//! These are the only artifacts downstream notifiers (PR comments, chat
//! webhooks, badges) should read. They must not recompute acceptance, delta or
//! trend logic themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::delta::Delta;
use crate::gate::GateDecision;
use crate::model::{BaselineMetadata, MetricValues, MetricsSnapshot};
use crate::trend::Trends;

/// Current schema version for summary.json and rejection.json
pub const SCHEMA_VERSION: u32 = 1;

/// Stable reason code for a gate rejection.
pub const REJECTION_REASON: &str = "metrics_not_acceptable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryAction {
    /// First accepted snapshot; no previous baseline existed.
    Created,
    Updated,
}

impl SummaryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryAction::Created => "created",
            SummaryAction::Updated => "updated",
        }
    }
}

/// Result of an accepted baseline update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Schema version for compatibility detection
    pub schema_version: u32,

    pub action: SummaryAction,

    /// When the baseline was accepted
    pub timestamp: DateTime<Utc>,

    pub commit: String,
    pub branch: String,

    /// Gate score of the accepted snapshot (0-100)
    pub score: f64,

    /// Accepted metric values; `null` per field when not measured
    pub metrics: MetricValues,

    /// Change against the previous baseline; `null` on the first run
    pub delta: Option<Delta>,

    pub trends: Trends,

    /// Number of entries in the history after this update
    pub history_size: usize,

    pub metadata: BaselineMetadata,
}

/// Audit record for a snapshot the gate refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub schema_version: u32,
    pub timestamp: DateTime<Utc>,
    pub commit: String,
    pub branch: String,
    /// Always [`REJECTION_REASON`]
    pub reason: String,
    pub score: f64,
    pub issues: Vec<String>,
}

impl Rejection {
    pub fn new(snapshot: &MetricsSnapshot, decision: &GateDecision, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            timestamp: now,
            commit: snapshot.commit.clone(),
            branch: snapshot.branch.clone(),
            reason: REJECTION_REASON.to_string(),
            score: decision.score,
            issues: decision.issues.clone(),
        }
    }
}

/// Write summary.json to file
pub fn write_summary(summary: &Summary, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TrendResult;

    fn sample_summary() -> Summary {
        Summary {
            schema_version: SCHEMA_VERSION,
            action: SummaryAction::Created,
            timestamp: "2026-03-01T12:00:00Z".parse().unwrap(),
            commit: "abc123".into(),
            branch: "main".into(),
            score: 100.0,
            metrics: MetricValues {
                performance: Some(88.0),
                coverage: None,
                bundle_size: Some(300_000),
            },
            delta: None,
            trends: Trends {
                performance: TrendResult::insufficient(),
                coverage: TrendResult::insufficient(),
                bundle_size: TrendResult::insufficient(),
            },
            history_size: 1,
            metadata: BaselineMetadata::default(),
        }
    }

    #[test]
    fn test_summary_json_contract() {
        let v = serde_json::to_value(sample_summary()).unwrap();
        assert_eq!(v["schemaVersion"], 1);
        assert_eq!(v["action"], "created");
        assert!(v["delta"].is_null(), "first run delta must be null, not omitted");
        assert!(v["metrics"]["coverage"].is_null());
        assert_eq!(v["metrics"]["bundleSize"], 300_000);
        assert_eq!(v["trends"]["bundleSize"]["trend"], "insufficient_data");
        assert_eq!(v["historySize"], 1);
    }

    #[test]
    fn test_rejection_from_decision() {
        let snapshot = MetricsSnapshot::new("deadbeef", "main").with_performance(10.0);
        let decision = GateDecision {
            acceptable: false,
            score: 0.0,
            issues: vec!["Performance score 10.0 is below minimum 70".into()],
        };
        let r = Rejection::new(&snapshot, &decision, Utc::now());
        assert_eq!(r.reason, REJECTION_REASON);
        assert_eq!(r.commit, "deadbeef");
        assert_eq!(r.issues.len(), 1);

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["reason"], "metrics_not_acceptable");
    }

    #[test]
    fn test_write_summary_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("summary.json");
        write_summary(&sample_summary(), &out).unwrap();
        let back: Summary =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back, sample_summary());
    }
}
