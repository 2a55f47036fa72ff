//! Human-readable one-liners and blocks for terminal output.
//! Advisory only: the JSON artifacts are the source of truth.

use crate::delta::{Delta, MetricDelta};
use crate::gate::GateDecision;
use crate::model::{Baseline, Metric, MetricValues};
use crate::report::summary::{Rejection, Summary};
use crate::trend::{Trend, Trends};

/// Formats a metric value with its unit. Bundle sizes are shown in KB.
#[must_use]
pub fn format_metric(metric: Metric, value: Option<f64>) -> String {
    match (metric, value) {
        (_, None) => "n/a".to_string(),
        (Metric::BundleSize, Some(bytes)) => format!("{:.1} KB", bytes / 1024.0),
        (_, Some(score)) => format!("{:.1}", score),
    }
}

#[must_use]
pub fn format_decision(decision: &GateDecision) -> String {
    if decision.acceptable {
        format!("Gate: accepted (score {:.1}%)", decision.score)
    } else if decision.issues.is_empty() {
        format!("Gate: rejected (score {:.1}%): no metrics available", decision.score)
    } else {
        format!(
            "Gate: rejected (score {:.1}%): {}",
            decision.score,
            decision.issues.join("; ")
        )
    }
}

#[must_use]
pub fn format_trends(trends: &Trends) -> String {
    let parts: Vec<String> = Metric::ALL
        .iter()
        .map(|m| {
            let r = trends.get(*m);
            match (r.trend, r.slope) {
                (Trend::InsufficientData, _) | (_, None) => {
                    format!("{}={}", m.key(), r.trend.as_str())
                }
                (_, Some(slope)) => format!("{}={} ({:+.2}/run)", m.key(), r.trend.as_str(), slope),
            }
        })
        .collect();
    format!("Trends: {}", parts.join(", "))
}

fn arrow(delta: &MetricDelta) -> &'static str {
    if delta.change > 0.0 {
        "↑"
    } else if delta.change < 0.0 {
        "↓"
    } else {
        "→"
    }
}

#[must_use]
pub fn format_delta_line(metric: Metric, delta: &MetricDelta) -> String {
    let pct = delta
        .change_percent
        .map(|p| format!(" ({:+.1}%)", p))
        .unwrap_or_default();
    format!(
        "{}: {} {} {}{}",
        metric.label(),
        format_metric(metric, Some(delta.baseline)),
        arrow(delta),
        format_metric(metric, Some(delta.current)),
        pct
    )
}

fn push_metrics(lines: &mut Vec<String>, metrics: &MetricValues, delta: Option<&Delta>) {
    for metric in Metric::ALL {
        match delta.and_then(|d| d.get(metric)) {
            Some(d) => lines.push(format!("  {}", format_delta_line(metric, d))),
            None => lines.push(format!(
                "  {}: {}",
                metric.label(),
                format_metric(metric, metrics.get(metric))
            )),
        }
    }
}

#[must_use]
pub fn format_baseline(baseline: &Baseline) -> String {
    let mut lines = vec![
        "Baseline".to_string(),
        format!("  Commit: {} ({})", baseline.commit, baseline.branch),
        format!("  Created: {}", baseline.created.format("%Y-%m-%d %H:%M:%S UTC")),
        format!(
            "  Updated: {}",
            baseline.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ];
    push_metrics(&mut lines, &baseline.metrics, None);
    if let Some(creator) = &baseline.metadata.creator {
        lines.push(format!("  Creator: {}", creator));
    }
    lines.join("\n")
}

#[must_use]
pub fn format_summary(summary: &Summary) -> String {
    let mut lines = vec![format!(
        "Baseline {} at {} ({}), score {:.1}%",
        summary.action.as_str(),
        summary.commit,
        summary.branch,
        summary.score
    )];
    push_metrics(&mut lines, &summary.metrics, summary.delta.as_ref());
    lines.push(format_trends(&summary.trends));
    lines.join("\n")
}

#[must_use]
pub fn format_rejection(rejection: &Rejection) -> String {
    let mut lines = vec![format!(
        "Not accepted as baseline at {} ({}), score {:.1}%",
        rejection.commit, rejection.branch, rejection.score
    )];
    lines.extend(rejection.issues.iter().map(|i| format!("  - {}", i)));
    lines.join("\n")
}
