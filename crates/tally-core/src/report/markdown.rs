//! Markdown PR comment bodies rendered from the persisted records.
//!
//! The leading HTML marker lets a commenter find and update its previous
//! comment instead of posting a new one on every run.

use crate::model::Metric;
use crate::report::console::format_metric;
use crate::report::summary::{Rejection, Summary};
use crate::trend::Trend;

pub const COMMENT_MARKER: &str = "<!-- tally-baseline-report -->";

fn trend_badge(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => ":chart_with_upwards_trend: improving",
        Trend::Worsening => ":chart_with_downwards_trend: worsening",
        Trend::Stable => ":left_right_arrow: stable",
        Trend::InsufficientData => ":grey_question: insufficient data",
    }
}

pub fn format_summary_comment(summary: &Summary) -> String {
    let mut md = String::new();
    md.push_str(COMMENT_MARKER);
    md.push('\n');
    md.push_str("## Metrics Baseline\n\n");
    md.push_str(&format!(
        "**Status:** :white_check_mark: Baseline {} (score {:.1}%)\n\n",
        summary.action.as_str(),
        summary.score
    ));

    md.push_str("| Metric | Baseline | Current | Change | Trend |\n");
    md.push_str("|--------|----------|---------|--------|-------|\n");
    for metric in Metric::ALL {
        let current = format_metric(metric, summary.metrics.get(metric));
        let (previous, change) = match summary.delta.as_ref().and_then(|d| d.get(metric)) {
            Some(d) => {
                let change = match d.change_percent {
                    Some(p) => format!("{:+.1}%", p),
                    None => format!("{:+.1}", d.change),
                };
                (format_metric(metric, Some(d.baseline)), change)
            }
            None => ("n/a".to_string(), "n/a".to_string()),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            metric.label(),
            previous,
            current,
            change,
            trend_badge(summary.trends.get(metric).trend)
        ));
    }

    md.push('\n');
    md.push_str(&format!(
        "Commit `{}` on `{}`. History: {} run(s).\n",
        escape_markdown_code(&summary.commit),
        escape_markdown_code(&summary.branch),
        summary.history_size
    ));
    md
}

pub fn format_rejection_comment(rejection: &Rejection) -> String {
    let mut md = String::new();
    md.push_str(COMMENT_MARKER);
    md.push('\n');
    md.push_str("## Metrics Baseline\n\n");
    md.push_str(&format!(
        "**Status:** :x: Not accepted as baseline (score {:.1}%)\n\n",
        rejection.score
    ));
    if rejection.issues.is_empty() {
        md.push_str("- No metrics were available for this run.\n");
    }
    for issue in &rejection.issues {
        md.push_str(&format!("- {}\n", escape_markdown_text(issue)));
    }
    md.push('\n');
    md.push_str(&format!(
        "Commit `{}` on `{}`. The existing baseline was left unchanged.\n",
        escape_markdown_code(&rejection.commit),
        escape_markdown_code(&rejection.branch)
    ));
    md
}

fn escape_markdown_code(input: &str) -> String {
    input.replace('`', "'").replace(['\r', '\n'], " ")
}

fn escape_markdown_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\r' | '\n' => out.push(' '),
            '\\' | '`' | '*' | '_' | '[' | ']' | '#' | '<' | '>' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{Delta, MetricDelta};
    use crate::model::{BaselineMetadata, MetricValues};
    use crate::report::summary::{SummaryAction, SCHEMA_VERSION};
    use crate::trend::{analyze, TrendResult, Trends};
    use chrono::Utc;

    #[test]
    fn test_summary_comment_table() {
        let summary = Summary {
            schema_version: SCHEMA_VERSION,
            action: SummaryAction::Updated,
            timestamp: Utc::now(),
            commit: "abc123".into(),
            branch: "main".into(),
            score: 100.0,
            metrics: MetricValues {
                performance: Some(90.0),
                coverage: Some(70.0),
                bundle_size: None,
            },
            delta: Some(Delta {
                performance: Some(MetricDelta::between(90.0, 80.0)),
                ..Default::default()
            }),
            trends: Trends {
                performance: analyze(&[80.0, 90.0], false, 0.5),
                coverage: TrendResult::insufficient(),
                bundle_size: TrendResult::insufficient(),
            },
            history_size: 2,
            metadata: BaselineMetadata::default(),
        };
        let md = format_summary_comment(&summary);
        assert!(md.starts_with(COMMENT_MARKER));
        assert!(md.contains("Baseline updated (score 100.0%)"));
        assert!(md.contains("| Performance | 80.0 | 90.0 | +12.5% | :chart_with_upwards_trend: improving |"));
        assert!(md.contains("| Coverage | n/a | 70.0 | n/a |"));
        assert!(md.contains("History: 2 run(s)."));
    }

    #[test]
    fn test_rejection_comment_escapes_issues() {
        let rejection = Rejection {
            schema_version: SCHEMA_VERSION,
            timestamp: Utc::now(),
            commit: "abc`123".into(),
            branch: "main".into(),
            reason: "metrics_not_acceptable".into(),
            score: 40.0,
            issues: vec!["Coverage score 10.0 is below minimum 60 <b>".into()],
        };
        let md = format_rejection_comment(&rejection);
        assert!(md.contains(":x: Not accepted as baseline (score 40.0%)"));
        assert!(md.contains("\\<b\\>"));
        assert!(md.contains("`abc'123`"));
    }
}
