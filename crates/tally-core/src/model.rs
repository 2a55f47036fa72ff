//! Snapshot and baseline records.
//!
//! Every metric is optional: an absent value means "not measured in this run"
//! and is skipped by the gate, the delta calculator and the trend analyzer.
//! It is never read as zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into persisted baselines.
pub const SCHEMA_VERSION: u32 = 1;

/// The three tracked metrics, in their fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Performance,
    Coverage,
    BundleSize,
}

impl Metric {
    /// Reporting order: performance, coverage, bundle size.
    pub const ALL: [Metric; 3] = [Metric::Performance, Metric::Coverage, Metric::BundleSize];

    /// Stable key used in JSON artifacts.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Performance => "performance",
            Metric::Coverage => "coverage",
            Metric::BundleSize => "bundleSize",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Performance => "Performance",
            Metric::Coverage => "Coverage",
            Metric::BundleSize => "Bundle size",
        }
    }

    /// True when a decreasing value is the desirable direction.
    pub fn is_inverse(self) -> bool {
        matches!(self, Metric::BundleSize)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Per-kind coverage scores as reported by the test runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statements: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<f64>,
}

impl CoverageBreakdown {
    /// Equal-weighted mean of the sub-scores that are present.
    pub fn aggregate(&self) -> Option<f64> {
        let present: Vec<f64> = [self.statements, self.branches, self.functions, self.lines]
            .into_iter()
            .flatten()
            .collect();
        if present.is_empty() {
            return None;
        }
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// One measurement cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(default = "unknown")]
    pub commit: String,

    #[serde(default = "unknown")]
    pub branch: String,

    /// Performance score, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,

    /// Aggregate coverage score, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,

    /// Used when `coverage` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_detail: Option<CoverageBreakdown>,

    /// Bundle size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_size: Option<u64>,
}

impl MetricsSnapshot {
    /// Empty snapshot taken now.
    pub fn new(commit: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            commit: commit.into(),
            branch: branch.into(),
            performance: None,
            coverage: None,
            coverage_detail: None,
            bundle_size: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_performance(mut self, score: f64) -> Self {
        self.performance = Some(score);
        self
    }

    pub fn with_coverage(mut self, score: f64) -> Self {
        self.coverage = Some(score);
        self
    }

    pub fn with_coverage_detail(mut self, detail: CoverageBreakdown) -> Self {
        self.coverage_detail = Some(detail);
        self
    }

    pub fn with_bundle_size(mut self, bytes: u64) -> Self {
        self.bundle_size = Some(bytes);
        self
    }

    /// Reported coverage, falling back to the breakdown average.
    pub fn coverage_score(&self) -> Option<f64> {
        self.coverage
            .or_else(|| self.coverage_detail.as_ref().and_then(|d| d.aggregate()))
    }

    /// Flattened metric values as consumed by the gate and delta calculator.
    pub fn values(&self) -> MetricValues {
        MetricValues {
            performance: self.performance,
            coverage: self.coverage_score(),
            bundle_size: self.bundle_size,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values().get(metric)
    }
}

/// The three metric values of a snapshot or baseline. `null` in JSON when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValues {
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub coverage: Option<f64>,
    #[serde(default)]
    pub bundle_size: Option<u64>,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Performance => self.performance,
            Metric::Coverage => self.coverage,
            Metric::BundleSize => self.bundle_size.map(|b| b as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Provenance of an accepted baseline. Not used by any decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_run_id: Option<String>,
}

/// The last accepted snapshot of the main line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub schema_version: u32,

    /// First acceptance.
    pub created: DateTime<Utc>,

    /// Most recent acceptance.
    pub last_updated: DateTime<Utc>,

    pub commit: String,
    pub branch: String,
    pub metrics: MetricValues,

    #[serde(default)]
    pub metadata: BaselineMetadata,
}

impl Baseline {
    /// Builds the baseline that replaces `previous` once `snapshot` is accepted.
    /// `created` carries over from the previous baseline when there is one.
    pub fn accept(
        snapshot: &MetricsSnapshot,
        previous: Option<&Baseline>,
        metadata: BaselineMetadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            created: previous.map(|p| p.created).unwrap_or(now),
            last_updated: now,
            commit: snapshot.commit.clone(),
            branch: snapshot.branch.clone(),
            metrics: snapshot.values(),
            metadata,
        }
    }
}
