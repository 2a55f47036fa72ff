//! Sources of the candidate [`MetricsSnapshot`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use crate::errors::SnapshotError;
use crate::model::{CoverageBreakdown, MetricsSnapshot};

/// Supplies the snapshot for the current run.
pub trait SnapshotSource {
    fn load(&self) -> Result<MetricsSnapshot, SnapshotError>;
}

/// Reads a JSON snapshot written by an earlier CI step.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn load(&self) -> Result<MetricsSnapshot, SnapshotError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SnapshotError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                SnapshotError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let parse_error = |message: String| SnapshotError::Parse {
            path: self.path.clone(),
            message,
        };
        // Every field has a default, so serde would also accept a sequence.
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
        if !value.is_object() {
            return Err(parse_error("expected a JSON object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))
    }
}

/// Mock producer: synthesizes plausible metrics instead of measuring anything.
///
/// Performance is drawn from 60-100, each coverage kind from 50-100 and the
/// bundle from 100-1200 KB. The same seed always yields the same values.
#[derive(Debug, Clone)]
pub struct SyntheticSnapshotSource {
    commit: String,
    branch: String,
    seed: Option<u64>,
}

impl SyntheticSnapshotSource {
    pub fn new(commit: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            branch: branch.into(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl SnapshotSource for SyntheticSnapshotSource {
    fn load(&self) -> Result<MetricsSnapshot, SnapshotError> {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut coverage_kind = || Some(one_decimal(rng.gen_range(50.0..=100.0)));
        let detail = CoverageBreakdown {
            statements: coverage_kind(),
            branches: coverage_kind(),
            functions: coverage_kind(),
            lines: coverage_kind(),
        };
        let aggregate = detail.aggregate().map(one_decimal);

        let performance = one_decimal(rng.gen_range(60.0..=100.0));
        let bundle_kb: u64 = rng.gen_range(100..=1200);

        let mut snapshot = MetricsSnapshot::new(self.commit.clone(), self.branch.clone())
            .with_performance(performance)
            .with_coverage_detail(detail)
            .with_bundle_size(bundle_kb * 1024);
        snapshot.coverage = aggregate;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSnapshotSource::new(dir.path().join("metrics.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound { .. }));
        assert!(err.is_missing());
    }

    #[test]
    fn test_file_source_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, "{\"performance\": \"fast\"}").unwrap();
        let err = FileSnapshotSource::new(&path).load().unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
        assert!(!err.is_missing());
    }

    #[test]
    fn test_file_source_rejects_non_object_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        for content in ["[]", r#"["2026-01-01T00:00:00Z","c","main",95]"#, "95", "null"] {
            std::fs::write(&path, content).unwrap();
            let err = FileSnapshotSource::new(&path).load().unwrap_err();
            assert!(
                matches!(err, SnapshotError::Parse { .. }),
                "{content} should not parse as a snapshot"
            );
        }
    }

    #[test]
    fn test_file_source_reads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(
            &path,
            r#"{"timestamp":"2026-05-01T10:00:00Z","commit":"abc","branch":"main","performance":91.5,"coverage":77.0,"bundleSize":409600}"#,
        )
        .unwrap();
        let snapshot = FileSnapshotSource::new(&path).load().unwrap();
        assert_eq!(snapshot.commit, "abc");
        assert_eq!(snapshot.bundle_size, Some(409_600));
        assert_eq!(snapshot.coverage_score(), Some(77.0));
    }

    #[test]
    fn test_synthetic_source_is_seeded_and_in_range() {
        let source = SyntheticSnapshotSource::new("abc", "main").with_seed(7);
        let a = source.load().unwrap();
        let b = source.load().unwrap();
        assert_eq!(a.values(), b.values());

        let perf = a.performance.unwrap();
        assert!((60.0..=100.0).contains(&perf));
        let cov = a.coverage_score().unwrap();
        assert!((50.0..=100.0).contains(&cov));
        let kb = a.bundle_size.unwrap() / 1024;
        assert!((100..=1200).contains(&kb));
    }
}
