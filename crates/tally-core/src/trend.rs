//! Trend classification over the trailing history window.
//!
//! The slope is an ordinary least-squares fit with the sequence index
//! (0..n-1) as x. Results are derived data: they are recomputed from the
//! history on every run and never read back.

use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::model::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    Stable,
    Improving,
    Worsening,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::InsufficientData => "insufficient_data",
            Trend::Stable => "stable",
            Trend::Improving => "improving",
            Trend::Worsening => "worsening",
        }
    }
}

/// Raw movement of the underlying value, independent of desirability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increasing,
    Decreasing,
    NoChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl TrendResult {
    pub fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            slope: None,
            direction: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub performance: TrendResult,
    pub coverage: TrendResult,
    pub bundle_size: TrendResult,
}

impl Trends {
    pub fn get(&self, metric: Metric) -> &TrendResult {
        match metric {
            Metric::Performance => &self.performance,
            Metric::Coverage => &self.coverage,
            Metric::BundleSize => &self.bundle_size,
        }
    }
}

/// OLS slope of `values` against their index. `None` for fewer than two points.
pub fn slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    // Non-zero for n >= 2 with distinct integer x.
    let denominator = n * sum_x2 - sum_x * sum_x;
    Some((n * sum_xy - sum_x * sum_y) / denominator)
}

/// Classifies a series. `inverse` marks metrics where decreasing is desirable.
pub fn analyze(values: &[f64], inverse: bool, stable_slope: f64) -> TrendResult {
    let Some(slope) = slope(values) else {
        return TrendResult::insufficient();
    };

    if slope.abs() < stable_slope {
        return TrendResult {
            trend: Trend::Stable,
            slope: Some(slope),
            direction: Some(Direction::NoChange),
        };
    }

    let increasing = slope > 0.0;
    let trend = if increasing != inverse {
        Trend::Improving
    } else {
        Trend::Worsening
    };
    TrendResult {
        trend,
        slope: Some(slope),
        direction: Some(if increasing {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }),
    }
}

/// Runs [`analyze`] for every metric over the newest `window` history entries.
pub fn analyze_history(history: &History, window: usize, stable_slope: f64) -> Trends {
    let per_metric = |metric: Metric| {
        analyze(
            &history.series(metric, window),
            metric.is_inverse(),
            stable_slope,
        )
    };
    Trends {
        performance: per_metric(Metric::Performance),
        coverage: per_metric(Metric::Coverage),
        bundle_size: per_metric(Metric::BundleSize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;
    use chrono::Utc;

    const STABLE: f64 = 0.5;

    #[test]
    fn test_insufficient_data() {
        assert_eq!(analyze(&[], false, STABLE).trend, Trend::InsufficientData);
        let single = analyze(&[99.0], true, STABLE);
        assert_eq!(single.trend, Trend::InsufficientData);
        assert_eq!(single.slope, None);
        assert_eq!(single.direction, None);
    }

    #[test]
    fn test_identical_values_are_stable() {
        let r = analyze(&[150_000.0; 10], true, STABLE);
        assert_eq!(r.trend, Trend::Stable);
        assert_eq!(r.slope, Some(0.0));
        assert_eq!(r.direction, Some(Direction::NoChange));
    }

    #[test]
    fn test_increasing_score_is_improving() {
        let r = analyze(&[100.0, 102.0, 104.0, 106.0, 108.0], false, STABLE);
        assert_eq!(r.trend, Trend::Improving);
        assert_eq!(r.direction, Some(Direction::Increasing));
        assert!((r.slope.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_growing_bundle_is_worsening() {
        let values: Vec<f64> = (0..10).map(|i| 100_000.0 + 10_000.0 * i as f64).collect();
        let r = analyze(&values, true, STABLE);
        assert_eq!(r.trend, Trend::Worsening);
        assert_eq!(r.direction, Some(Direction::Increasing));
        assert!((r.slope.unwrap() - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_shrinking_bundle_is_improving() {
        let r = analyze(&[300.0, 200.0, 100.0], true, STABLE);
        assert_eq!(r.trend, Trend::Improving);
        assert_eq!(r.direction, Some(Direction::Decreasing));
    }

    #[test]
    fn test_small_slope_is_stable() {
        // slope = 0.4
        let r = analyze(&[80.0, 80.4, 80.8], false, STABLE);
        assert_eq!(r.trend, Trend::Stable);
        let r = analyze(&[80.0, 79.0, 78.0], false, STABLE);
        assert_eq!(r.trend, Trend::Worsening);
    }

    #[test]
    fn test_analyze_history_uses_trailing_window() {
        // Old entries decrease, the last five increase.
        let perf = [90.0, 80.0, 70.0, 60.0, 61.0, 63.0, 65.0, 67.0];
        let entries = perf
            .iter()
            .enumerate()
            .map(|(i, p)| HistoryEntry {
                timestamp: Utc::now(),
                commit: format!("c{i}"),
                branch: "main".into(),
                performance: Some(*p),
                coverage: None,
                bundle_size: Some(200_000),
            })
            .collect();
        let trends = analyze_history(&History::from_entries(entries), 5, STABLE);
        assert_eq!(trends.performance.trend, Trend::Improving);
        assert_eq!(trends.coverage.trend, Trend::InsufficientData);
        assert_eq!(trends.get(Metric::BundleSize).trend, Trend::Stable);
    }

    #[test]
    fn test_trend_json_shape() {
        let json = serde_json::to_value(analyze(&[1.0, 5.0], false, STABLE)).unwrap();
        assert_eq!(json["trend"], "improving");
        assert_eq!(json["direction"], "increasing");
        assert_eq!(json["slope"], 4.0);
        let json = serde_json::to_value(TrendResult::insufficient()).unwrap();
        assert_eq!(json, serde_json::json!({"trend": "insufficient_data"}));
    }
}
