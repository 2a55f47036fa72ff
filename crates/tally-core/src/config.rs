//! `tally.yaml` configuration.
//!
//! Every field has a default, so a missing file behaves like an empty one.
//! Unknown keys are rejected to catch typos in CI config early.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "tally.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,
    pub gate: GateConfig,
    pub baseline: BaselineSettings,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gate: GateConfig::default(),
            baseline: BaselineSettings::default(),
        }
    }
}

/// A lower bound on a score metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinThreshold {
    pub min: f64,
    pub weight: f64,
}

/// An upper bound on the bundle size, in KB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaxSizeThreshold {
    pub max_kb: f64,
    pub weight: f64,
}

/// Weighted bounds used by the acceptance gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Minimum weighted percentage for a snapshot to be accepted.
    pub pass_percentage: f64,
    pub performance: MinThreshold,
    pub coverage: MinThreshold,
    pub bundle_size: MaxSizeThreshold,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            pass_percentage: 70.0,
            performance: MinThreshold {
                min: 70.0,
                weight: 30.0,
            },
            coverage: MinThreshold {
                min: 60.0,
                weight: 40.0,
            },
            bundle_size: MaxSizeThreshold {
                max_kb: 1000.0,
                weight: 30.0,
            },
        }
    }
}

/// When and how the baseline is rolled forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineSettings {
    /// Branches allowed to update the baseline (case-insensitive).
    pub main_branches: Vec<String>,
    /// CI event kinds that qualify for an update (case-insensitive).
    pub events: Vec<String>,
    /// Maximum number of history entries kept.
    pub history_limit: usize,
    /// Trailing history entries considered by the trend analyzer.
    pub trend_window: usize,
    /// Slopes with a smaller magnitude are reported as stable.
    pub stable_slope: f64,
    pub state_dir: PathBuf,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            main_branches: vec!["main".to_string(), "master".to_string()],
            events: vec!["push".to_string(), "merge".to_string()],
            history_limit: 50,
            trend_window: 5,
            stable_slope: 0.5,
            state_dir: PathBuf::from(".tally"),
        }
    }
}

impl BaselineSettings {
    /// `refs/heads/main` and `Main` both match a configured `main`.
    pub fn is_main_branch(&self, branch: &str) -> bool {
        let branch = branch.strip_prefix("refs/heads/").unwrap_or(branch);
        self.main_branches
            .iter()
            .any(|b| b.eq_ignore_ascii_case(branch))
    }

    pub fn is_qualifying_event(&self, event: &str) -> bool {
        self.events.iter().any(|e| e.eq_ignore_ascii_case(event))
    }
}

impl TallyConfig {
    /// Loads config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let cfg: TallyConfig = if content.trim().is_empty() {
            TallyConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                message: e.to_string(),
            })?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let gate = &self.gate;
        if !(0.0..=100.0).contains(&gate.pass_percentage) {
            return Err(ConfigError::Invalid {
                field: "gate.pass_percentage",
                reason: format!("{} is outside 0..=100", gate.pass_percentage),
            });
        }
        for (field, weight) in [
            ("gate.performance.weight", gate.performance.weight),
            ("gate.coverage.weight", gate.coverage.weight),
            ("gate.bundle_size.weight", gate.bundle_size.weight),
        ] {
            if weight.is_nan() || weight < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("weight must be >= 0, got {weight}"),
                });
            }
        }
        let b = &self.baseline;
        if b.main_branches.is_empty() {
            return Err(ConfigError::Invalid {
                field: "baseline.main_branches",
                reason: "at least one branch is required".to_string(),
            });
        }
        if b.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "baseline.history_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if b.trend_window == 0 || b.trend_window > b.history_limit {
            return Err(ConfigError::Invalid {
                field: "baseline.trend_window",
                reason: format!("must be within 1..={}", b.history_limit),
            });
        }
        if b.stable_slope.is_nan() || b.stable_slope < 0.0 {
            return Err(ConfigError::Invalid {
                field: "baseline.stable_slope",
                reason: format!("must be >= 0, got {}", b.stable_slope),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let cfg = TallyConfig::from_yaml("").unwrap();
        assert_eq!(cfg, TallyConfig::default());
        assert_eq!(cfg.gate.coverage.weight, 40.0);
        assert_eq!(cfg.baseline.history_limit, 50);
        assert_eq!(cfg.baseline.trend_window, 5);
    }

    #[test]
    fn test_partial_override() {
        let cfg = TallyConfig::from_yaml(
            r#"
gate:
  performance: { min: 80, weight: 50 }
baseline:
  trend_window: 10
  main_branches: [trunk]
"#,
        )
        .unwrap();
        assert_eq!(cfg.gate.performance.min, 80.0);
        assert_eq!(cfg.gate.coverage.min, 60.0);
        assert_eq!(cfg.baseline.trend_window, 10);
        assert!(cfg.baseline.is_main_branch("trunk"));
        assert!(!cfg.baseline.is_main_branch("main"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TallyConfig::from_yaml("gate:\n  pass_percent: 70\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_window_larger_than_history_rejected() {
        let err = TallyConfig::from_yaml("baseline:\n  history_limit: 3\n  trend_window: 5\n")
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "baseline.trend_window")
        );
    }

    #[test]
    fn test_branch_and_event_matching() {
        let settings = BaselineSettings::default();
        assert!(settings.is_main_branch("MAIN"));
        assert!(settings.is_main_branch("refs/heads/master"));
        assert!(!settings.is_main_branch("feature/main"));
        assert!(settings.is_qualifying_event("Push"));
        assert!(!settings.is_qualifying_event("pull_request"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TallyConfig::load(&dir.path().join("tally.yaml")).unwrap();
        assert_eq!(cfg, TallyConfig::default());
    }
}
