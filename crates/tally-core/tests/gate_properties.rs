use proptest::prelude::*;
use tally_core::trend::{analyze, Trend};
use tally_core::{GateConfig, History, HistoryEntry, MetricValues};

fn metric_values() -> impl Strategy<Value = MetricValues> {
    (
        proptest::option::of(0.0f64..=100.0),
        proptest::option::of(0.0f64..=100.0),
        proptest::option::of(0u64..=4_000_000),
    )
        .prop_map(|(performance, coverage, bundle_size)| MetricValues {
            performance,
            coverage,
            bundle_size,
        })
}

#[test]
fn empty_snapshot_always_fails_closed() {
    let d = GateConfig::default().evaluate(&MetricValues::default());
    assert!(!d.acceptable);
    assert_eq!(d.score, 0.0);
    assert!(d.issues.is_empty());
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(values in metric_values()) {
        let gate = GateConfig::default();
        prop_assert_eq!(gate.evaluate(&values), gate.evaluate(&values));
    }

    #[test]
    fn score_is_a_percentage(values in metric_values()) {
        let d = GateConfig::default().evaluate(&values);
        prop_assert!((0.0..=100.0).contains(&d.score));
        if d.acceptable {
            prop_assert!(!values.is_empty());
        }
    }

    #[test]
    fn improving_a_metric_never_flips_accept_to_reject(
        values in metric_values(),
        perf_gain in 0.0f64..50.0,
        cov_gain in 0.0f64..50.0,
        bundle_cut in 0u64..1_000_000,
    ) {
        let gate = GateConfig::default();
        let better = MetricValues {
            performance: values.performance.map(|p| p + perf_gain),
            coverage: values.coverage.map(|c| c + cov_gain),
            bundle_size: values.bundle_size.map(|b| b.saturating_sub(bundle_cut)),
        };
        let before = gate.evaluate(&values);
        let after = gate.evaluate(&better);
        prop_assert!(after.score >= before.score);
        if before.acceptable {
            prop_assert!(after.acceptable);
        }
    }

    #[test]
    fn issues_only_for_failing_metrics(values in metric_values()) {
        let d = GateConfig::default().evaluate(&values);
        if d.issues.is_empty() && !values.is_empty() {
            prop_assert_eq!(d.score, 100.0);
        }
    }

    #[test]
    fn history_never_exceeds_limit(pushes in 0usize..120, limit in 1usize..60) {
        let mut history = History::new();
        for i in 0..pushes {
            history.push_bounded(
                HistoryEntry {
                    timestamp: chrono::Utc::now(),
                    commit: format!("c{i}"),
                    branch: "main".into(),
                    performance: Some(80.0),
                    coverage: None,
                    bundle_size: None,
                },
                limit,
            );
        }
        prop_assert_eq!(history.len(), pushes.min(limit));
        if let Some(last) = history.entries().last() {
            prop_assert_eq!(&last.commit, &format!("c{}", pushes - 1));
        }
    }

    #[test]
    fn inverse_flips_label_but_not_direction(start in 0.0f64..1000.0, step in 1.0f64..100.0) {
        let rising: Vec<f64> = (0..5).map(|i| start + step * i as f64).collect();
        let plain = analyze(&rising, false, 0.5);
        let inverse = analyze(&rising, true, 0.5);
        prop_assert_eq!(plain.trend, Trend::Improving);
        prop_assert_eq!(inverse.trend, Trend::Worsening);
        prop_assert_eq!(plain.direction, inverse.direction);
    }
}
