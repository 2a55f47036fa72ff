//! Acceptance gate: weighted threshold check deciding whether a snapshot may
//! become the new baseline.
//!
//! Each present metric contributes its weight to the total; it contributes to
//! the score only when its bound holds. Absent metrics are neither counted nor
//! penalized. A snapshot without any metric fails closed with a score of 0.

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::model::{Metric, MetricValues};

const BYTES_PER_KB: f64 = 1024.0;

/// Outcome of evaluating a snapshot against the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub acceptable: bool,
    /// Weighted pass percentage, 0-100.
    pub score: f64,
    /// One line per failing metric, in metric order.
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Check {
    weight: f64,
    passed: bool,
}

impl GateConfig {
    /// Evaluates `values` against the configured bounds.
    pub fn evaluate(&self, values: &MetricValues) -> GateDecision {
        let mut score = 0.0;
        let mut total_weight = 0.0;
        let mut issues = Vec::new();

        for metric in Metric::ALL {
            let Some(value) = values.get(metric) else {
                continue;
            };
            let check = self.check(metric, value, &mut issues);
            total_weight += check.weight;
            if check.passed {
                score += check.weight;
            }
        }

        let percentage = if total_weight > 0.0 {
            score / total_weight * 100.0
        } else {
            0.0
        };

        GateDecision {
            acceptable: percentage >= self.pass_percentage && total_weight > 0.0,
            score: percentage,
            issues,
        }
    }

    fn check(&self, metric: Metric, value: f64, issues: &mut Vec<String>) -> Check {
        match metric {
            Metric::Performance | Metric::Coverage => {
                let t = if metric == Metric::Performance {
                    self.performance
                } else {
                    self.coverage
                };
                let passed = value >= t.min;
                if !passed {
                    issues.push(format!(
                        "{} score {:.1} is below minimum {}",
                        metric.label(),
                        value,
                        t.min
                    ));
                }
                Check {
                    weight: t.weight,
                    passed,
                }
            }
            Metric::BundleSize => {
                let t = self.bundle_size;
                let kb = value / BYTES_PER_KB;
                let passed = kb <= t.max_kb;
                if !passed {
                    issues.push(format!(
                        "{} {:.1}KB exceeds maximum {}KB",
                        metric.label(),
                        kb,
                        t.max_kb
                    ));
                }
                Check {
                    weight: t.weight,
                    passed,
                }
            }
        }
    }
}
