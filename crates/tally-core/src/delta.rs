//! Change between an accepted snapshot and the baseline it replaces.

use serde::{Deserialize, Serialize};

use crate::model::{Baseline, Metric, MetricValues};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub current: f64,
    pub baseline: f64,
    pub change: f64,
    /// Omitted when the baseline value is zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl MetricDelta {
    pub fn between(current: f64, baseline: f64) -> Self {
        let change = current - baseline;
        let change_percent = if baseline != 0.0 {
            Some(change / baseline * 100.0)
        } else {
            None
        };
        Self {
            current,
            baseline,
            change,
            change_percent,
        }
    }
}

/// Per-metric deltas. A metric is present only when both sides report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<MetricDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<MetricDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_size: Option<MetricDelta>,
}

impl Delta {
    pub fn get(&self, metric: Metric) -> Option<&MetricDelta> {
        match metric {
            Metric::Performance => self.performance.as_ref(),
            Metric::Coverage => self.coverage.as_ref(),
            Metric::BundleSize => self.bundle_size.as_ref(),
        }
    }

    fn slot(&mut self, metric: Metric) -> &mut Option<MetricDelta> {
        match metric {
            Metric::Performance => &mut self.performance,
            Metric::Coverage => &mut self.coverage,
            Metric::BundleSize => &mut self.bundle_size,
        }
    }
}

/// Returns `None` when there is no previous baseline (first run).
pub fn compute(current: &MetricValues, baseline: Option<&Baseline>) -> Option<Delta> {
    let baseline = baseline?;
    let mut delta = Delta::default();
    for metric in Metric::ALL {
        if let (Some(cur), Some(base)) = (current.get(metric), baseline.metrics.get(metric)) {
            *delta.slot(metric) = Some(MetricDelta::between(cur, base));
        }
    }
    Some(delta)
}
